use serde::{Deserialize, Serialize};
use crate::{Error, Position};

/// A named position a handler can return to with `hop` or `back`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
  pub name: String,
  pub node: String,
  pub step: i64,
}

impl Mark {
  pub fn new<N, S>(name: N, node: S, step: i64) -> Self
      where N: Into<String>, S: Into<String>
  {
    Mark { name: name.into(), node: node.into(), step }
  }

  /// Check the name, node and step, returning the first invalid field.
  pub fn validate(&self) -> Result<(), Error> {
    if self.name.is_empty() {
      return Err(Error::MarkNameEmpty);
    }
    if self.node.is_empty() {
      return Err(Error::MarkNodeEmpty);
    }
    if self.step < 0 {
      return Err(Error::MarkStepNegative(self.step));
    }
    Ok(())
  }

  pub fn position(&self) -> Position {
    Position::new(self.node.clone(), self.step)
  }
}

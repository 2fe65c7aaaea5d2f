use serde::{Deserialize, Serialize};
use super::Error;

/// A node name and an index into that node's handler chain.
///
/// The step is signed so that corrupt persisted data can still be read and then rejected by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
  pub node: String,
  pub step: i64,
}

impl Position {
  pub fn new<S: Into<String>>(node: S, step: i64) -> Self {
    Position { node: node.into(), step }
  }
}

/// Where a conversation resumes on its next turn.
///
/// `detached` is the stack of outer positions suspended by entering a sub-flow, most recent last.
///
/// The persisted shape is
/// `{"current":{"node":"main","step":1},"detached":[{"node":"outer","step":2}]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
  pub current: Position,
  pub detached: Vec<Position>,
}

impl Progress {
  /// Progress at `current` with no suspended frames
  pub fn new(current: Position) -> Self {
    Progress { current, detached: Vec::new() }
  }

  /// Progress at the first step of `node`
  pub fn start<S: Into<String>>(node: S) -> Self {
    Self::new(Position::new(node, 0))
  }

  /// Check every position, returning the first invalid field.
  pub fn validate(&self) -> Result<(), Error> {
    if self.current.node.is_empty() {
      return Err(Error::CurrentNodeEmpty);
    }
    if self.current.step < 0 {
      return Err(Error::CurrentStepNegative(self.current.step));
    }

    for (index, item) in self.detached.iter().enumerate() {
      if item.node.is_empty() {
        return Err(Error::DetachedNodeEmpty { index });
      }
      if item.step < 0 {
        return Err(Error::DetachedStepNegative { index, step: item.step });
      }
    }
    Ok(())
  }
}

impl Default for Progress {
  /// Unset progress: it fails validation until a real position is stored
  fn default() -> Self {
    Self::new(Position::new("", 0))
  }
}

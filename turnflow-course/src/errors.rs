use turnflow_base::IdError;
use crate::{FlowType, NodeId};

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum Error {
  #[error("node lookup failed: {0}")]
  NodeId(#[from] IdError<NodeId>),

  /// Nothing is registered for the requested selection (`None` means the whole flow)
  #[error("no nodes registered for {0:?}")]
  NoNodes(Option<FlowType>),

  /// A persisted position points before the start of a chain
  #[error("invalid step {step} for node '{node}'")]
  InvalidStep { node: String, step: i64 },
}

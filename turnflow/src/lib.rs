//! Resume, run and persist conversational flows one turn at a time.
//!
//! A [`Flow`](flow::Flow) is a graph of named nodes, each an ordered chain of [`Handler`](flow::Handler)s.
//! Every incoming message is one turn: build a [`Course`] from the flow and the conversation's [`Session`],
//! [`run`](Course::run) it, then store the session until the next message.

// include commonly used traits
pub mod prelude {
  pub use turnflow_course::{FlowGraph, Handler};
  pub use async_trait::async_trait;
}

pub mod object {
  pub use turnflow_base::{ObjectStore, ObjectStoreContent, IdError};
}

pub mod session {
  pub use turnflow_session::{Session, SessionId, SessionConfig};
  pub use turnflow_session::{Progress, Position, Mark};
  pub use turnflow_session::Error;
}

pub mod flow {
  pub use turnflow_course::{Flow, FlowGraph, FlowType, Node, NodeId};
  pub use turnflow_course::{Handler, CallbackHandler};
}

pub use turnflow_course::{Course, CourseConfig, CourseState, MAX_STACK};
pub use turnflow_course::Error;
pub use turnflow_session::{Session, SessionId};

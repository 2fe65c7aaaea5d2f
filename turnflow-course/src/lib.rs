//! Flow graph and execution engine for [TurnFlow](crate)
//!
//! A [`Flow`] holds named [`Node`]s, each an ordered chain of [`Handler`]s.
//! A [`Course`] is built for a single conversation turn: it resumes a [`Session`](turnflow_session::Session)
//! at its stored position, runs the handlers and writes the new position back.

mod errors;
pub use errors::Error;

mod handler;
pub use handler::{ Handler, CallbackHandler };

mod node;
pub use node::{ Node, NodeId };

mod flow;
pub use flow::{ Flow, FlowGraph, FlowType };

mod course;
pub use course::{ Course, CourseConfig, CourseState, MAX_STACK };

#[cfg(test)]
mod test;

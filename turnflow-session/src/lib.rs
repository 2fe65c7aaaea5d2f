//! Persisted conversation state for [TurnFlow](crate)
//!
//! [`Session`] owns the position a conversation resumes from on its next turn:
//! the current [`Position`], the stack of suspended outer positions and the named [`Mark`]s.

mod session;
pub use session::{ Session, SessionId, SessionConfig };

mod progress;
pub use progress::{ Position, Progress };

mod mark;
pub use mark::Mark;

mod errors;
pub use errors::Error;

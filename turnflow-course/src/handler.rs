use std::sync::Arc;
use async_trait::async_trait;
use crate::Course;

/// One step of a [`Node`](crate::Node)'s chain.
///
/// A handler runs with the [`Course`] of the current turn. It reads and updates the session through
/// [`Course::session_mut`] and steers execution with the navigation methods (`next`, `wait`, `jump`, `begin`, ...).
/// Only the first navigation call of an invocation takes effect.
///
/// Doing nothing keeps the conversation on the same step: the next turn runs this handler again.
#[async_trait]
pub trait Handler: Send + Sync {
  async fn call(&self, course: &mut Course<'_>);
}

/// Handler that wraps a synchronous closure.
pub struct CallbackHandler<F> {
  cb: F,
}

impl<F> std::fmt::Debug for CallbackHandler<F> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "CallbackHandler")
  }
}

impl<F> CallbackHandler<F>
    where F: Fn(&mut Course<'_>) + Send + Sync
{
  pub fn new(cb: F) -> Self {
    CallbackHandler { cb }
  }

  pub fn boxed(self) -> Arc<dyn Handler>
      where F: 'static
  {
    Arc::new(self)
  }
}

#[async_trait]
impl<F> Handler for CallbackHandler<F>
    where F: Fn(&mut Course<'_>) + Send + Sync
{
  async fn call(&self, course: &mut Course<'_>) {
    (self.cb)(course)
  }
}

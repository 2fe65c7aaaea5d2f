use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use turnflow_session::{Position, Progress, Session, SessionId};
use turnflow_test_util::test_id;
use crate::{CallbackHandler, Course, Handler};

/// Labels of the handlers that ran, in order
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
  pub fn new() -> Self {
    Default::default()
  }

  pub fn push(&self, label: &str) {
    self.0.lock().unwrap().push(label.to_owned());
  }

  pub fn calls(&self) -> Vec<String> {
    self.0.lock().unwrap().clone()
  }
}

/// Handler that leaves the course untouched
pub fn noop() -> Arc<dyn Handler> {
  CallbackHandler::new(|_course| {}).boxed()
}

/// Handler that records `label` and then runs `f`
pub fn logged<F>(log: &CallLog, label: &str, f: F) -> Arc<dyn Handler>
    where F: Fn(&mut Course<'_>) + Send + Sync + 'static
{
  let log = log.clone();
  let label = label.to_owned();
  CallbackHandler::new(move |course: &mut Course<'_>| {
    log.push(&label);
    f(course);
  }).boxed()
}

/// Async handler that yields to the runtime before advancing
#[derive(Debug)]
pub struct YieldThenNext {
  pub log: CallLog,
  pub label: &'static str,
}

#[async_trait]
impl Handler for YieldThenNext {
  async fn call(&self, course: &mut Course<'_>) {
    tokio::task::yield_now().await;
    self.log.push(self.label);
    course.next();
  }
}

pub fn session_at(node: &str, step: i64) -> Session {
  let mut session = Session::new(test_id!(SessionId));
  session.set_progress(Progress::new(Position::new(node, step))).unwrap();
  session
}

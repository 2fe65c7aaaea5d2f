use std::collections::HashSet;
use std::sync::Arc;
use turnflow_session::{Position, Progress, Session};
use crate::{Error, FlowGraph, FlowType, Node};

/// Invocation cap for a single pass over a chain
pub const MAX_STACK: usize = 250;

/// Limits for a [`Course`]
#[derive(Debug, Clone, PartialEq)]
pub struct CourseConfig {
  /// Upper bound on the loop counter of a pass. The counter is bumped before it is compared,
  /// so a pass runs at most `max_stack - 1` handlers.
  pub max_stack: usize,
}

impl Default for CourseConfig {
  fn default() -> Self {
    CourseConfig { max_stack: MAX_STACK }
  }
}

/// Outcome of the last handler invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseState {
  Default,
  /// [`Course::end`] was called. No further pass runs this turn.
  Completed,
  /// The chain ran past its last step
  Overload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
  Incoming,
  Trailing,
  Outgoing,
}

impl From<FlowType> for Pass {
  fn from(flow_type: FlowType) -> Self {
    match flow_type {
      FlowType::Incoming => Pass::Incoming,
      FlowType::Outgoing => Pass::Outgoing,
    }
  }
}

/// Outer position suspended by [`Course::begin`]
#[derive(Debug)]
struct Frame {
  node: Arc<Node>,
  step: usize,
}

fn persisted_step(step: usize) -> i64 {
  i64::try_from(step).unwrap_or(i64::MAX)
}

/// Executes one conversation turn.
///
/// A `Course` is built from a [`FlowGraph`] and the [`Session`] of the conversation, resuming at the session's stored progress.
/// [`run`](Course::run) then makes three passes:
/// 1. the [`Incoming`](FlowType::Incoming) middleware nodes
/// 2. the chain of the current node (the trailing pass), returning from sub-flows as they run out
/// 3. the [`Outgoing`](FlowType::Outgoing) middleware nodes
///
/// Each handler invocation costs one unit of budget. Navigation calls that ask for more work (`next`, `jump`, `begin`, ...)
/// add one back, so a chain keeps running only as long as its handlers keep moving it along.
///
/// # Examples
/// ```
/// # use turnflow_course::{Course, Flow, CallbackHandler};
/// # use turnflow_session::{Session, SessionId, Progress, Position};
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let mut flow = Flow::new();
/// flow.insert_node("welcome", vec![
///   CallbackHandler::new(|course| { course.next(); }).boxed(),
///   CallbackHandler::new(|course| { course.wait(); }).boxed(),
///   CallbackHandler::new(|course| { course.end(); }).boxed(),
/// ]).unwrap();
///
/// let mut session = Session::new(SessionId::new(0));
/// session.set_progress(Progress::start("welcome")).unwrap();
///
/// let mut course = Course::new(&flow, &mut session).unwrap();
/// assert!(course.run().await);
///
/// // the second handler paused the conversation, the next turn resumes at the third
/// assert_eq!(session.progress().current, Position::new("welcome", 2));
/// # });
/// ```
pub struct Course<'a> {
  flow: &'a dyn FlowGraph,
  session: &'a mut Session,
  config: CourseConfig,

  node: Arc<Node>,
  step: usize,
  detached: Vec<Frame>,

  lifes: u32,
  lock: bool,
  state: CourseState,
}

impl<'a> std::fmt::Debug for Course<'a> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Course")
      .field("session", self.session.id())
      .field("node", &self.node.name())
      .field("step", &self.step)
      .field("detached", &self.detached)
      .field("lifes", &self.lifes)
      .field("state", &self.state)
      .finish()
  }
}

impl<'a> Course<'a> {
  /// Resume `session` at its stored progress.
  ///
  /// Fails if any stored position no longer resolves in `flow`. The turn must not be run in that case.
  pub fn new(flow: &'a dyn FlowGraph, session: &'a mut Session) -> Result<Self, Error> {
    Self::with_config(flow, session, CourseConfig::default())
  }

  pub fn with_config(flow: &'a dyn FlowGraph, session: &'a mut Session, config: CourseConfig) -> Result<Self, Error> {
    let progress = session.progress();
    let (node, step) = Self::resolve(flow, &progress.current)?;
    let detached = progress.detached
      .iter()
      .map(|position| Self::resolve(flow, position).map(|(node, step)| Frame { node, step }))
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Course {
      flow,
      session,
      config,
      node,
      step,
      detached,
      lifes: 1,
      lock: false,
      state: CourseState::Default,
    })
  }

  fn resolve(flow: &dyn FlowGraph, position: &Position) -> Result<(Arc<Node>, usize), Error> {
    let node = flow.node(&position.node)?;
    let step = usize::try_from(position.step)
      .map_err(|_e| Error::InvalidStep { node: position.node.clone(), step: position.step })?;
    Ok((node, step))
  }

  pub fn state(&self) -> CourseState {
    self.state
  }

  /// Node currently being executed
  pub fn node(&self) -> &Arc<Node> {
    &self.node
  }

  pub fn step(&self) -> usize {
    self.step
  }

  pub fn position(&self) -> Position {
    Position::new(self.node.name(), persisted_step(self.step))
  }

  /// Number of suspended outer positions
  pub fn detached_len(&self) -> usize {
    self.detached.len()
  }

  /// Remaining handler invocations for the current pass
  pub fn lifes(&self) -> u32 {
    self.lifes
  }

  pub fn session(&self) -> &Session {
    &*self.session
  }

  pub fn session_mut(&mut self) -> &mut Session {
    &mut *self.session
  }

  /// Execute the turn.
  ///
  /// Returns `true` if every pass ran. Returns `false` when the incoming middleware kept the turn to itself,
  /// when a handler ended the conversation, or when this course has already left its default state.
  #[tracing::instrument(skip(self), fields(session = %self.session.id()))]
  pub async fn run(&mut self) -> bool {
    if self.state != CourseState::Default {
      return false;
    }

    let status = self.middleware(FlowType::Incoming).await;
    if status && self.state != CourseState::Overload {
      tracing::trace!("incoming middleware held the turn");
      return false;
    }

    self.trailing().await;
    if self.state == CourseState::Completed {
      return false;
    }

    self.middleware(FlowType::Outgoing).await;
    true
  }

  async fn call(&mut self, pass: Pass) {
    let mut stack = 0;
    loop {
      stack += 1;
      if stack >= self.config.max_stack {
        tracing::trace!(?pass, node = self.node.name(), step = self.step, "iteration cap reached");
        break;
      }
      if self.lifes == 0 {
        tracing::trace!(?pass, node = self.node.name(), step = self.step, "budget spent");
        break;
      }
      let handler = match self.node.chain().get(self.step) {
        Some(handler) => Arc::clone(handler),
        None => break,
      };

      self.lock = false;
      self.state = CourseState::Default;

      tracing::trace!(?pass, node = self.node.name(), step = self.step, "calling handler");
      handler.call(self).await;

      self.lifes = self.lifes.saturating_sub(1);

      // return from a sub-flow that ran out
      if pass == Pass::Trailing && self.state == CourseState::Overload {
        if let Some(frame) = self.detached.pop() {
          let step = frame.step + 1;
          if step < frame.node.len() {
            tracing::debug!(node = frame.node.name(), step, "resuming detached frame");
            self.node = frame.node;
            self.step = step;
          }
        }
      }
    }
  }

  async fn trailing(&mut self) {
    self.call(Pass::Trailing).await;
    self.set_session_progress();
  }

  async fn middleware(&mut self, flow_type: FlowType) -> bool {
    let node = Arc::clone(&self.node);
    let step = self.step;

    let nodes = match self.flow.nodes(Some(flow_type)) {
      Ok(nodes) => nodes,
      Err(err) => {
        tracing::trace!(?flow_type, %err, "no middleware pass");
        return false;
      }
    };

    self.lifes = 1;

    for middleware_node in nodes.iter() {
      self.node = Arc::clone(middleware_node);
      self.step = 0;

      self.call(flow_type.into()).await;

      if self.state != CourseState::Overload {
        break;
      }
    }

    let names = nodes.iter().map(|node| node.name()).collect::<HashSet<_>>();
    if !names.contains(self.node.name()) {
      tracing::debug!(?flow_type, node = self.node.name(), step = self.step, "left the middleware nodes");
      self.set_session_progress();
      self.state = CourseState::Overload;
      return true;
    }

    self.node = node;
    self.step = step;
    true
  }

  fn set_session_progress(&mut self) {
    let progress = Progress {
      current: self.position(),
      detached: self.detached
        .iter()
        .map(|frame| Position::new(frame.node.name(), persisted_step(frame.step)))
        .collect(),
    };
    if let Err(err) = self.session.set_progress(progress) {
      tracing::warn!(%err, "could not store progress");
    }
  }

  fn relocate(&mut self, node: Arc<Node>, step: usize) {
    self.node = node;
    self.step = step;
  }

  /// Take the single navigation decision of this invocation. `false` if it was already taken.
  fn take_lock(&mut self) -> bool {
    if self.lock {
      return false;
    }
    self.lock = true;
    true
  }

  /// Advance to the following step and run it this turn.
  ///
  /// Advancing from the last step leaves the chain in [`CourseState::Overload`], which falls through to the
  /// next middleware node or returns from a sub-flow.
  pub fn next(&mut self) -> bool {
    if !self.take_lock() {
      return false;
    }

    if self.step + 1 >= self.node.len() {
      self.state = CourseState::Overload;
    }

    self.step += 1;
    self.lifes += 1;
    true
  }

  /// Advance to the following step but stop for this turn
  pub fn wait(&mut self) -> bool {
    if !self.take_lock() {
      return false;
    }

    self.step += 1;
    true
  }

  /// Continue at `index` in the current chain
  pub fn jump(&mut self, index: usize) -> bool {
    if !self.take_lock() {
      return false;
    }

    if index >= self.node.len() {
      return false;
    }

    self.lifes += 1;
    self.step = index;
    true
  }

  /// Store the current position under `name`. This does not take the navigation decision.
  pub fn mark(&mut self, name: &str) -> bool {
    if name.is_empty() {
      return false;
    }
    let step = persisted_step(self.step);
    self.session.set_mark(name, self.node.name(), step).is_ok()
  }

  /// Continue at the mark stored under `name`
  pub fn hop(&mut self, name: &str) -> bool {
    if !self.take_lock() {
      return false;
    }

    if name.is_empty() {
      return false;
    }
    let position = match self.session.mark(name) {
      Some(mark) => mark.position(),
      None => return false,
    };
    self.go_to_mark(position)
  }

  /// Continue at the most recently stored mark
  pub fn back(&mut self) -> bool {
    if !self.take_lock() {
      return false;
    }

    let position = match self.session.last_mark() {
      Some(mark) => mark.position(),
      None => return false,
    };
    self.go_to_mark(position)
  }

  fn go_to_mark(&mut self, position: Position) -> bool {
    let (node, step) = match Self::resolve(self.flow, &position) {
      Ok(resolved) => resolved,
      Err(err) => {
        tracing::debug!(%err, "mark no longer resolves");
        return false;
      }
    };

    tracing::debug!(node = node.name(), step, "moving to mark");
    self.relocate(node, step);
    self.set_session_progress();
    self.lifes += 1;
    true
  }

  /// Run the current step again
  pub fn restart(&mut self) -> bool {
    if !self.take_lock() {
      return false;
    }

    self.lifes += 1;
    true
  }

  /// Run the current chain again from its first step
  pub fn reset(&mut self) -> bool {
    if !self.take_lock() {
      return false;
    }

    self.lifes += 1;
    self.step = 0;
    true
  }

  /// Enter the node `name` as a sub-flow.
  ///
  /// The current position is suspended and resumed at the step after it once the sub-flow runs past its last step.
  pub fn begin(&mut self, name: &str) -> bool {
    if !self.take_lock() {
      return false;
    }

    if name.is_empty() {
      return false;
    }
    let node = match self.flow.node(name) {
      Ok(node) => node,
      Err(_) => return false,
    };

    tracing::debug!(from = self.node.name(), from_step = self.step, to = name, "beginning sub-flow");
    let outer = Frame { node: Arc::clone(&self.node), step: self.step };
    self.detached.push(outer);
    self.relocate(node, 0);

    self.state = CourseState::Default;

    self.set_session_progress();
    self.lifes += 1;
    true
  }

  /// Continue at the start of node `name`, dropping every suspended sub-flow
  pub fn replace(&mut self, name: &str) -> bool {
    if !self.take_lock() {
      return false;
    }

    if name.is_empty() {
      return false;
    }
    let node = match self.flow.node(name) {
      Ok(node) => node,
      Err(_) => return false,
    };

    tracing::debug!(from = self.node.name(), to = name, dropped = self.detached.len(), "replacing flow");
    self.relocate(node, 0);
    self.detached.clear();

    self.state = CourseState::Default;

    self.set_session_progress();
    self.lifes += 1;
    true
  }

  /// Finish the conversation.
  ///
  /// Stops the turn and moves to the first step of the first node in the flow, dropping every suspended sub-flow.
  pub fn end(&mut self) -> bool {
    if !self.take_lock() {
      return false;
    }

    self.lifes = 0;
    self.state = CourseState::Completed;

    let first = match self.flow.nodes(None) {
      Ok(nodes) => nodes.into_iter().next(),
      Err(_) => None,
    };
    let node = match first {
      Some(node) => node,
      None => return false,
    };

    tracing::debug!(from = self.node.name(), to = node.name(), "conversation completed");
    self.relocate(node, 0);
    self.detached.clear();

    self.set_session_progress();
    true
  }
}

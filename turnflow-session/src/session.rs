use std::collections::{HashMap, VecDeque};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use turnflow_base::generate_id_type;
use super::{Error, Mark, Progress};


generate_id_type!(SessionId);


/// Limits applied by a [`Session`]
///
/// The config is not part of the stored session. A deserialized session starts with the default config,
/// so callers that use their own limits apply them again with [`Session::set_config`] after loading.
///
/// ```
/// # use turnflow_session::SessionConfig;
/// let mut config: SessionConfig = Default::default();
/// config.expiration = chrono::Duration::minutes(30);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
  /// How long after the last [`refresh`](Session::refresh) the session counts as expired
  pub expiration: Duration,

  /// History length above which the oldest mark is evicted before a new one is appended.
  /// The check runs before the push, so the history settles at one more than this value.
  pub max_history_marks: usize,
}

impl Default for SessionConfig {
  fn default() -> Self {
    SessionConfig {
      expiration: Duration::hours(16),
      max_history_marks: 3,
    }
  }
}


/// The long-lived state of one conversation.
///
/// A session stores where the conversation resumes ([`Progress`]) and the named [`Mark`]s handlers set along the way.
/// It is read when a turn starts and written back through validated setters only.
/// Deserializing runs the same checks: a stored session with an invalid position or mark is rejected.
///
/// # Examples
/// ```
/// # use turnflow_session::{Session, SessionId, Progress};
/// let mut session = Session::new(SessionId::new(0));
/// session.set_progress(Progress::start("welcome")).unwrap();
///
/// session.set_mark("greeted", "welcome", 2).unwrap();
/// assert_eq!(session.last_mark().unwrap().name, "greeted");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StoredSession")]
pub struct Session {
  id: SessionId,
  #[serde(skip)]
  config: SessionConfig,

  progress: Progress,
  marks: HashMap<String, Mark>,
  history: VecDeque<Mark>,

  last_refresh: DateTime<Utc>,
  active: bool,
  status: bool,
}

/// Unchecked shape of a stored [`Session`]
#[derive(Deserialize)]
struct StoredSession {
  id: SessionId,
  progress: Progress,
  marks: HashMap<String, Mark>,
  history: VecDeque<Mark>,
  last_refresh: DateTime<Utc>,
  active: bool,
  status: bool,
}

impl TryFrom<StoredSession> for Session {
  type Error = Error;

  fn try_from(stored: StoredSession) -> Result<Self, Self::Error> {
    stored.progress.validate()?;
    for (key, mark) in stored.marks.iter() {
      mark.validate()?;
      if *key != mark.name {
        return Err(Error::MarkKeyMismatch { key: key.clone(), name: mark.name.clone() });
      }
    }
    for mark in stored.history.iter() {
      mark.validate()?;
    }

    let mut session = Session {
      id: stored.id,
      config: SessionConfig::default(),
      progress: stored.progress,
      marks: stored.marks,
      history: stored.history,
      last_refresh: stored.last_refresh,
      active: stored.active,
      status: stored.status,
    };
    session.trim_history();
    Ok(session)
  }
}

impl Session {
  /// Create a new `Session`. Its progress is unset until [`set_progress`](Session::set_progress) is called.
  pub fn new(id: SessionId) -> Self {
    Self::with_config(id, SessionConfig::default())
  }

  pub fn with_config(id: SessionId, config: SessionConfig) -> Self {
    Session {
      id,
      config,
      progress: Progress::default(),
      marks: HashMap::new(),
      history: VecDeque::new(),
      last_refresh: Utc::now(),
      active: false,
      status: true,
    }
  }

  pub fn id(&self) -> &SessionId {
    &self.id
  }

  pub fn config(&self) -> &SessionConfig {
    &self.config
  }

  /// Replace the limits, trimming the mark history down to the new bound.
  pub fn set_config(&mut self, config: SessionConfig) {
    self.config = config;
    self.trim_history();
  }

  // oldest marks go first; the bound is one above `max_history_marks` since eviction runs before a push
  fn trim_history(&mut self) {
    while self.history.len() > self.config.max_history_marks + 1 {
      if let Some(evicted) = self.history.pop_front() {
        tracing::trace!(session = %self.id, mark = %evicted.name, "evicted mark from history");
      }
    }
  }

  pub fn progress(&self) -> &Progress {
    &self.progress
  }

  /// Replace the stored progress.
  ///
  /// Nothing is stored unless every position in `progress` is valid.
  pub fn set_progress(&mut self, progress: Progress) -> Result<(), Error> {
    progress.validate()?;
    self.progress = progress;
    Ok(())
  }

  /// Get a mark by its name
  pub fn mark(&self, name: &str) -> Option<&Mark> {
    self.marks.get(name)
  }

  /// The most recently set mark
  pub fn last_mark(&self) -> Option<&Mark> {
    self.history.back()
  }

  /// Recently set marks, oldest first
  pub fn history(&self) -> impl Iterator<Item = &Mark> {
    self.history.iter()
  }

  /// Record a mark at `node`/`step` under `name`.
  ///
  /// A mark with the same name is overwritten. The mark is also appended to the recency history,
  /// evicting the oldest entry first if the history is over [`SessionConfig::max_history_marks`].
  pub fn set_mark<N, S>(&mut self, name: N, node: S, step: i64) -> Result<(), Error>
      where N: Into<String>, S: Into<String>
  {
    let mark = Mark::new(name, node, step);
    mark.validate()?;

    while self.history.len() > self.config.max_history_marks {
      if let Some(evicted) = self.history.pop_front() {
        tracing::trace!(session = %self.id, mark = %evicted.name, "evicted mark from history");
      }
    }
    self.history.push_back(mark.clone());

    self.marks.insert(mark.name.clone(), mark);
    Ok(())
  }

  /// Whether `now` is past the expiration window that started at the last refresh.
  ///
  /// Expiry is advisory: the session keeps all of its state.
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
    now > self.last_refresh + self.config.expiration
  }

  /// Restart the expiration window at `now`
  pub fn refresh(&mut self, now: DateTime<Utc>) {
    self.last_refresh = now;
  }

  pub fn last_refresh(&self) -> DateTime<Utc> {
    self.last_refresh
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn set_active(&mut self, value: bool) {
    self.active = value;
  }

  pub fn status(&self) -> bool {
    self.status
  }

  pub fn set_status(&mut self, value: bool) {
    self.status = value;
  }

  /// Flag the conversation as finished for the caller. The stored progress is left as is.
  pub fn end(&mut self) {
    self.status = false;
  }
}

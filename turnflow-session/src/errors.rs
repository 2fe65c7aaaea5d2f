/// Validation failures when updating a [`Session`](crate::Session).
///
/// Each variant names the first field that was found invalid. The session is left untouched.
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum Error {
  // progress errors
  #[error("progress (current) node name must be a non-empty string")]
  CurrentNodeEmpty,
  #[error("progress (current) step must be 0 or greater, got {0}")]
  CurrentStepNegative(i64),
  #[error("progress (detached item {index}) node name must be a non-empty string")]
  DetachedNodeEmpty { index: usize },
  #[error("progress (detached item {index}) step must be 0 or greater, got {step}")]
  DetachedStepNegative { index: usize, step: i64 },

  // mark errors
  #[error("mark name must be a non-empty string")]
  MarkNameEmpty,
  #[error("mark node name must be a non-empty string")]
  MarkNodeEmpty,
  #[error("mark step must be 0 or greater, got {0}")]
  MarkStepNegative(i64),
  #[error("mark stored under '{key}' is named '{name}'")]
  MarkKeyMismatch { key: String, name: String },
}

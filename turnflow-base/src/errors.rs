use std::fmt::Debug;

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum IdError<TID: Debug> {
  #[error("cannot parse id from '{0}'")]
  CannotParse(String),
  #[error("id {0:?} was not reserved by the store")]
  IdNotReserved(TID),
  #[error("id {0:?} already exists")]
  IdAlreadyExists(TID),
  #[error("id {0:?} is missing")]
  IdMissing(TID),
  #[error("name must be a non-empty string")]
  EmptyName,
  #[error("name '{0}' already exists")]
  NameAlreadyExists(String),
  #[error("no object named '{0}'")]
  NoSuchName(String),
}

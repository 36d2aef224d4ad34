//! Error types for `flock-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid account id: {0:?}")]
  InvalidId(String),

  #[error("{field} must not be blank")]
  Validation { field: &'static str },

  #[error("account id {0} is already taken")]
  DuplicateId(String),

  #[error("account not found: {0}")]
  AccountNotFound(String),

  #[error("account {0} cannot follow itself")]
  SelfSubscription(String),

  #[error("snapshot belongs to {found}, not {expected}")]
  SnapshotMismatch { expected: String, found: String },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

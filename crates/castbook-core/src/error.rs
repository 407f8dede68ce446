//! Error types for `castbook-core`.

use thiserror::Error;

use crate::actor::ValidationErrors;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown nationality code: {0:?}")]
  UnknownNationality(String),

  #[error("validation failed: {0}")]
  Validation(#[from] ValidationErrors),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

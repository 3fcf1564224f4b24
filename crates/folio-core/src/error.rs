//! Error types for `folio-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::validate::ValidationFailure;

#[derive(Debug, Error)]
pub enum Error {
  /// The submission broke one or more field rules. Caused by the caller.
  #[error("{0}")]
  Validation(#[from] ValidationFailure),

  #[error("message not found: {0}")]
  NotFound(Uuid),

  /// Persistence failed; the detail is for logs, not for callers.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error as [`Error::Store`].
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

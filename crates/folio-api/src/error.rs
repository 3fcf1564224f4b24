//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use folio_core::envelope::Envelope;
use thiserror::Error;

pub const NOT_FOUND: &str = "Message not found";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  /// Infrastructure failure. Only `public` reaches the caller; `source` is
  /// logged.
  #[error("{public}: {source}")]
  Internal {
    public: &'static str,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  /// Map a service error, using `public` as the caller-facing text if it
  /// turns out to be an infrastructure failure.
  pub fn from_core(e: folio_core::Error, public: &'static str) -> Self {
    match e {
      folio_core::Error::Validation(v) => ApiError::BadRequest(v.joined()),
      folio_core::Error::NotFound(_) => ApiError::NotFound(NOT_FOUND.to_owned()),
      folio_core::Error::Store(source) => ApiError::Internal { public, source },
    }
  }

  pub fn message_not_found() -> Self { ApiError::NotFound(NOT_FOUND.to_owned()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::Internal { public, source } => {
        tracing::error!(error = %source, "{public}");
        (StatusCode::INTERNAL_SERVER_ERROR, public.to_owned())
      }
    };
    (status, Json(Envelope::failure(message))).into_response()
  }
}

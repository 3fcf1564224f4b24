//! JSON REST API for folio contact messages.
//!
//! Exposes an axum [`Router`] backed by any [`folio_core::store::MessageStore`].
//! TLS, CORS and transport concerns are the caller's responsibility. The
//! list/get/delete routes are not authenticated.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", folio_api::api_router(service))
//! ```

pub mod client_ip;
pub mod contact;
pub mod error;

use axum::{
  Router,
  routing::get,
};
use folio_core::{service::MessageService, store::MessageStore};

pub use client_ip::ClientIp;
pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: MessageService<S>) -> Router<()>
where
  S: MessageStore + 'static,
{
  Router::new()
    .route("/contact", get(contact::list::<S>).post(contact::create::<S>))
    .route(
      "/contact/{id}",
      get(contact::get_one::<S>).delete(contact::delete_one::<S>),
    )
    .with_state(service)
}

// ─── Router tests ─────────────────────────────────────────────────────────────

//! The `MessageStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `folio-store-sqlite`).
//! [`crate::service::MessageService`] depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::message::{Message, MessageSummary, NewMessage};

/// Abstraction over a folio message store backend.
///
/// The only in-place write a backend performs is [`MessageStore::mark_read`].
/// Concurrent calls are last-write-wins; no locking is expected.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait MessageStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new message and return it. The store assigns `id` and
  /// `created_at`, and `is_read` starts as `false`.
  fn insert(
    &self,
    input: NewMessage,
  ) -> impl Future<Output = Result<Message, Self::Error>> + Send + '_;

  /// Every message, newest first by `created_at`, without source addresses.
  fn list_newest_first(
    &self,
  ) -> impl Future<Output = Result<Vec<MessageSummary>, Self::Error>> + Send + '_;

  /// Retrieve a message by id. Returns `None` if not found. Does not mark it
  /// read.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Message>, Self::Error>> + Send + '_;

  /// Set `is_read` to `true`. Returns `false` if no such message exists.
  /// Repeating the call is harmless.
  fn mark_read(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Permanently remove a message. Returns `false` if it did not exist.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

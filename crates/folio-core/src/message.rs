//! Message: the persisted record created from an accepted submission.
//!
//! A message is immutable once written, apart from the one-way `is_read`
//! transition. There is no update operation on the body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validate::ValidSubmission;

// ─── Message ─────────────────────────────────────────────────────────────────

/// A stored contact message, as returned by an individual fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
  pub id:         Uuid,
  pub name:       String,
  pub email:      String,
  pub subject:    String,
  pub message:    String,
  /// Captured from the request; never supplied by the sender.
  pub ip_address: String,
  pub is_read:    bool,
  /// Server-assigned; never changes after creation.
  pub created_at: DateTime<Utc>,
}

// ─── Summary ─────────────────────────────────────────────────────────────────

/// The list projection of a [`Message`]. The source address is not part of
/// the type, so no listing can leak it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSummary {
  pub id:         Uuid,
  pub name:       String,
  pub email:      String,
  pub subject:    String,
  pub message:    String,
  pub is_read:    bool,
  pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageSummary {
  fn from(m: Message) -> Self {
    Self {
      id:         m.id,
      name:       m.name,
      email:      m.email,
      subject:    m.subject,
      message:    m.message,
      is_read:    m.is_read,
      created_at: m.created_at,
    }
  }
}

// ─── Confirmation ────────────────────────────────────────────────────────────

/// What the sender gets back after a successful create. Never carries the
/// message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
  pub id:         Uuid,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

impl From<&Message> for Confirmation {
  fn from(m: &Message) -> Self {
    Self {
      id:         m.id,
      name:       m.name.clone(),
      created_at: m.created_at,
    }
  }
}

// ─── NewMessage ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::MessageStore::insert`].
/// `id`, `created_at` and `is_read` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewMessage {
  pub submission: ValidSubmission,
  pub ip_address: String,
}

impl NewMessage {
  pub fn new(submission: ValidSubmission, ip_address: impl Into<String>) -> Self {
    Self { submission, ip_address: ip_address.into() }
  }
}

//! [`SqliteStore`], the SQLite implementation of [`MessageStore`].

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use folio_core::{
  message::{Message, MessageSummary, NewMessage},
  store::MessageStore,
};

use crate::{
  Error, Result,
  encode::{
    MESSAGE_COLUMNS, RawMessage, RawSummary, SUMMARY_COLUMNS, encode_dt,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A folio message store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Cheap liveness check used by the health endpoint.
  pub async fn ping(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── MessageStore impl ───────────────────────────────────────────────────────

impl MessageStore for SqliteStore {
  type Error = Error;

  async fn insert(&self, input: NewMessage) -> Result<Message> {
    let s = input.submission;
    let message = Message {
      id:         Uuid::new_v4(),
      name:       s.name().to_owned(),
      email:      s.email().to_owned(),
      subject:    s.subject().to_owned(),
      message:    s.message().to_owned(),
      ip_address: input.ip_address,
      is_read:    false,
      // Stored with microsecond precision; truncate so the returned value
      // matches what a later read decodes.
      created_at: Utc::now().trunc_subsecs(6),
    };

    let id_str     = encode_uuid(message.id);
    let at_str     = encode_dt(message.created_at);
    let name       = message.name.clone();
    let email      = message.email.clone();
    let subject    = message.subject.clone();
    let body       = message.message.clone();
    let ip_address = message.ip_address.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO messages (
             message_id, name, email, subject, body, ip_address, is_read, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
          rusqlite::params![id_str, name, email, subject, body, ip_address, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(message)
  }

  async fn list_newest_first(&self) -> Result<Vec<MessageSummary>> {
    let raws: Vec<RawSummary> = self
      .conn
      .call(|conn| {
        // rowid breaks ties between inserts within the same microsecond.
        let mut stmt = conn.prepare(&format!(
          "SELECT {SUMMARY_COLUMNS} FROM messages
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map([], RawSummary::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSummary::into_summary).collect()
  }

  async fn get(&self, id: Uuid) -> Result<Option<Message>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawMessage> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE message_id = ?1"),
              rusqlite::params![id_str],
              RawMessage::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMessage::into_message).transpose()
  }

  async fn mark_read(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE messages SET is_read = 1 WHERE message_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM messages WHERE message_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }
}

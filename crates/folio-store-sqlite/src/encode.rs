//! Encoding and decoding helpers between folio domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`
//! suffix) so that lexical order in SQL matches chronological order. UUIDs are
//! stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use folio_core::message::{Message, MessageSummary};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every full-row `SELECT`.
pub const MESSAGE_COLUMNS: &str =
  "message_id, name, email, subject, body, ip_address, is_read, created_at";

/// Column list for listings; `ip_address` is never selected.
pub const SUMMARY_COLUMNS: &str =
  "message_id, name, email, subject, body, is_read, created_at";

/// Raw values read directly from a `messages` row.
pub struct RawMessage {
  pub message_id: String,
  pub name:       String,
  pub email:      String,
  pub subject:    String,
  pub body:       String,
  pub ip_address: String,
  pub is_read:    bool,
  pub created_at: String,
}

impl RawMessage {
  /// Map a row selected with [`MESSAGE_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      message_id: row.get(0)?,
      name:       row.get(1)?,
      email:      row.get(2)?,
      subject:    row.get(3)?,
      body:       row.get(4)?,
      ip_address: row.get(5)?,
      is_read:    row.get(6)?,
      created_at: row.get(7)?,
    })
  }

  pub fn into_message(self) -> Result<Message> {
    Ok(Message {
      id:         decode_uuid(&self.message_id)?,
      name:       self.name,
      email:      self.email,
      subject:    self.subject,
      message:    self.body,
      ip_address: self.ip_address,
      is_read:    self.is_read,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values for a listing row (no source address).
pub struct RawSummary {
  pub message_id: String,
  pub name:       String,
  pub email:      String,
  pub subject:    String,
  pub body:       String,
  pub is_read:    bool,
  pub created_at: String,
}

impl RawSummary {
  /// Map a row selected with [`SUMMARY_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      message_id: row.get(0)?,
      name:       row.get(1)?,
      email:      row.get(2)?,
      subject:    row.get(3)?,
      body:       row.get(4)?,
      is_read:    row.get(5)?,
      created_at: row.get(6)?,
    })
  }

  pub fn into_summary(self) -> Result<MessageSummary> {
    Ok(MessageSummary {
      id:         decode_uuid(&self.message_id)?,
      name:       self.name,
      email:      self.email,
      subject:    self.subject,
      message:    self.body,
      is_read:    self.is_read,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_sort_lexically() {
    let a = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let b = a + chrono::Duration::microseconds(1);
    let c = a + chrono::Duration::seconds(1);

    let (ea, eb, ec) = (encode_dt(a), encode_dt(b), encode_dt(c));
    assert_eq!(ea.len(), eb.len());
    assert!(ea < eb && eb < ec);
    assert_eq!(ea, "2024-05-01T12:00:00.000000Z");
  }

  #[test]
  fn datetime_roundtrip() {
    let a = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
    assert_eq!(decode_dt(&encode_dt(a)).unwrap(), a);
  }

  #[test]
  fn bad_uuid_is_an_error() {
    assert!(matches!(decode_uuid("not-a-uuid"), Err(Error::Uuid(_))));
  }
}

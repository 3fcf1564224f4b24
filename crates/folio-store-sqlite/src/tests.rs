//! Integration tests for `SqliteStore` against an in-memory database.

use folio_core::{
  message::NewMessage,
  store::MessageStore,
  submission::{Field, Submission},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_message(name: &str) -> NewMessage {
  let valid = Submission::new(
    name,
    "jo@example.com",
    "Project Inquiry",
    "I would like to discuss a project with you.",
  )
  .into_valid()
  .expect("valid submission");
  NewMessage::new(valid, "203.0.113.7")
}

// ─── Insert / get ────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get() {
  let s = store().await;

  let m = s.insert(new_message("Jo Doe")).await.unwrap();
  assert_eq!(m.name, "Jo Doe");
  assert!(!m.is_read);

  let fetched = s.get(m.id).await.unwrap().expect("stored row");
  assert_eq!(fetched, m);
  assert_eq!(fetched.ip_address, "203.0.113.7");
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn body_is_stored_verbatim() {
  let s = store().await;
  let valid = Submission::default()
    .with_field(Field::Name, "Jo Doe")
    .with_field(Field::Email, "jo@example.com")
    .with_field(Field::Subject, "Quotes 'and' \"marks\"")
    .with_field(Field::Message, "Line one\nLine two; DROP TABLE messages;")
    .into_valid()
    .unwrap();

  let m = s.insert(NewMessage::new(valid, "::1")).await.unwrap();
  let fetched = s.get(m.id).await.unwrap().unwrap();
  assert_eq!(fetched.subject, "Quotes 'and' \"marks\"");
  assert_eq!(fetched.message, "Line one\nLine two; DROP TABLE messages;");
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_is_newest_first() {
  let s = store().await;
  let a = s.insert(new_message("First Sender")).await.unwrap();
  let b = s.insert(new_message("Second Sender")).await.unwrap();
  let c = s.insert(new_message("Third Sender")).await.unwrap();

  let ids: Vec<_> = s
    .list_newest_first()
    .await
    .unwrap()
    .into_iter()
    .map(|m| m.id)
    .collect();
  assert_eq!(ids, [c.id, b.id, a.id]);
}

#[tokio::test]
async fn list_empty_store() {
  let s = store().await;
  assert!(s.list_newest_first().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_does_not_mark_read() {
  let s = store().await;
  let m = s.insert(new_message("Jo Doe")).await.unwrap();

  s.list_newest_first().await.unwrap();
  assert!(!s.get(m.id).await.unwrap().unwrap().is_read);
}

// ─── Read marking ────────────────────────────────────────────────────────────

#[tokio::test]
async fn mark_read_is_idempotent() {
  let s = store().await;
  let m = s.insert(new_message("Jo Doe")).await.unwrap();

  assert!(s.mark_read(m.id).await.unwrap());
  assert!(s.mark_read(m.id).await.unwrap());
  assert!(s.get(m.id).await.unwrap().unwrap().is_read);

  let listed = s.list_newest_first().await.unwrap();
  assert!(listed[0].is_read);
}

#[tokio::test]
async fn mark_read_missing_returns_false() {
  let s = store().await;
  assert!(!s.mark_read(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn mark_read_touches_only_one_row() {
  let s = store().await;
  let a = s.insert(new_message("First Sender")).await.unwrap();
  let b = s.insert(new_message("Second Sender")).await.unwrap();

  s.mark_read(a.id).await.unwrap();
  assert!(!s.get(b.id).await.unwrap().unwrap().is_read);
}

// ─── Deletion ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_row() {
  let s = store().await;
  let m = s.insert(new_message("Jo Doe")).await.unwrap();

  assert!(s.delete(m.id).await.unwrap());
  assert!(s.get(m.id).await.unwrap().is_none());
  assert!(!s.delete(m.id).await.unwrap());
}

#[tokio::test]
async fn delete_missing_leaves_others() {
  let s = store().await;
  s.insert(new_message("Jo Doe")).await.unwrap();

  assert!(!s.delete(Uuid::new_v4()).await.unwrap());
  assert_eq!(s.list_newest_first().await.unwrap().len(), 1);
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopen_file_keeps_rows() {
  let path = std::env::temp_dir().join(format!("folio-{}.db", Uuid::new_v4()));

  let id = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.insert(new_message("Jo Doe")).await.unwrap().id
  };

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.get(id).await.unwrap().unwrap().name, "Jo Doe");
  s.ping().await.unwrap();

  drop(s);
  let _ = std::fs::remove_file(&path);
}

//! Async HTTP client wrapping the folio JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use folio_core::{
  envelope::Envelope,
  message::{Confirmation, Message, MessageSummary},
  submission::Submission,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Connection settings for the folio API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the folio JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  pub fn base_url(&self) -> &str { &self.config.base_url }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  // ── Submission ────────────────────────────────────────────────────────────

  /// `POST /api/contact`
  pub async fn send_message(&self, submission: &Submission) -> Result<Confirmation> {
    let resp = self
      .client
      .post(self.url("/contact"))
      .json(submission)
      .send()
      .await
      .context("POST /contact failed")?;

    into_data(resp, "POST /contact").await
  }

  // ── Inbox ─────────────────────────────────────────────────────────────────

  /// `GET /api/contact`
  pub async fn list_messages(&self) -> Result<Vec<MessageSummary>> {
    let resp = self
      .client
      .get(self.url("/contact"))
      .send()
      .await
      .context("GET /contact failed")?;

    into_data(resp, "GET /contact").await
  }

  /// `GET /api/contact/<id>`; the server marks the message read.
  pub async fn get_message(&self, id: Uuid) -> Result<Message> {
    let resp = self
      .client
      .get(self.url(&format!("/contact/{id}")))
      .send()
      .await
      .context("GET /contact/<id> failed")?;

    into_data(resp, "GET /contact/<id>").await
  }

  /// `DELETE /api/contact/<id>`
  pub async fn delete_message(&self, id: Uuid) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/contact/{id}")))
      .send()
      .await
      .context("DELETE /contact/<id> failed")?;

    envelope::<()>(resp, "DELETE /contact/<id>").await.map(drop)
  }
}

/// Decode the response envelope, turning a non-2xx status into an error that
/// carries the server's `message`.
async fn envelope<T: DeserializeOwned>(
  resp: Response,
  what: &str,
) -> Result<Envelope<T>> {
  let status = resp.status();
  if !status.is_success() {
    let detail = resp
      .json::<Envelope<serde_json::Value>>()
      .await
      .ok()
      .and_then(|e| e.message)
      .unwrap_or_default();
    return Err(anyhow!("{what} → {status}: {detail}"));
  }
  resp
    .json()
    .await
    .with_context(|| format!("deserialising {what}"))
}

async fn into_data<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
  envelope(resp, what)
    .await?
    .data
    .ok_or_else(|| anyhow!("{what}: response carried no data"))
}

#[cfg(test)]
pub(crate) mod tests {
  use std::{net::SocketAddr, sync::Arc};

  use folio_core::service::MessageService;
  use folio_store_sqlite::SqliteStore;
  use tokio::net::TcpListener;

  use super::*;

  /// Serve the real contact API over an in-memory store on a loopback port.
  pub(crate) async fn spawn_api() -> ApiClient {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let app = axum::Router::new()
      .nest("/api", folio_api::api_router(MessageService::new(store)));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
      )
      .await
      .unwrap();
    });

    ApiClient::new(ApiConfig { base_url: format!("http://{addr}/") }).unwrap()
  }

  pub(crate) fn jo() -> Submission {
    Submission::new(
      "Jo Doe",
      "jo@example.com",
      "Project Inquiry",
      "I would like to discuss a project with you.",
    )
  }

  #[tokio::test]
  async fn inbox_round_trip() {
    let client = spawn_api().await;

    let conf = client.send_message(&jo()).await.unwrap();
    assert_eq!(conf.name, "Jo Doe");

    let list = client.list_messages().await.unwrap();
    assert_eq!(list.len(), 1);
    assert!(!list[0].is_read);

    let message = client.get_message(conf.id).await.unwrap();
    assert!(message.is_read);
    assert_eq!(message.ip_address, "127.0.0.1");
    assert!(client.list_messages().await.unwrap()[0].is_read);

    client.delete_message(conf.id).await.unwrap();
    let err = client.get_message(conf.id).await.unwrap_err();
    assert!(err.to_string().contains("Message not found"), "{err}");
    assert!(client.list_messages().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn rejected_submission_keeps_server_message() {
    let client = spawn_api().await;
    let err = client
      .send_message(&jo().with_field(folio_core::submission::Field::Name, ""))
      .await
      .unwrap_err();
    let text = err.to_string();
    assert!(text.contains("400"), "{text}");
    assert!(text.contains("Name is required"), "{text}");
  }

  #[tokio::test]
  async fn deleting_twice_is_an_error() {
    let client = spawn_api().await;
    let conf = client.send_message(&jo()).await.unwrap();
    client.delete_message(conf.id).await.unwrap();
    assert!(client.delete_message(conf.id).await.is_err());
  }

  #[test]
  fn url_joins_without_double_slash() {
    let client =
      ApiClient::new(ApiConfig { base_url: "http://localhost:5000/".into() })
        .unwrap();
    assert_eq!(client.url("/contact"), "http://localhost:5000/api/contact");
  }
}

//! Where a finished submission is delivered.
//!
//! The form only sees the [`Sink`] trait. Which concrete sink it gets is
//! decided once at startup from configuration ([`ConfiguredSink`]).

use std::{future::Future, time::Duration};

use folio_core::submission::Submission;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::client::ApiClient;

pub const DEFAULT_RELAY_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

// ─── Trait ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SinkError {
  /// The folio API refused the submission or could not be reached.
  #[error(transparent)]
  Api(#[from] anyhow::Error),

  #[error("email relay request failed: {0}")]
  Relay(#[from] reqwest::Error),

  #[error("email relay answered {status}: {body}")]
  RelayRejected { status: StatusCode, body: String },
}

/// A destination for contact submissions. Either the whole submission is
/// accepted or an error is returned.
pub trait Sink: Send + Sync + 'static {
  fn submit<'a>(
    &'a self,
    submission: &'a Submission,
  ) -> impl Future<Output = Result<(), SinkError>> + Send + 'a;
}

// ─── Backend API ──────────────────────────────────────────────────────────────

/// Delivers to `POST {base_url}/api/contact`.
pub struct ApiSink {
  client: ApiClient,
}

impl ApiSink {
  pub fn new(client: ApiClient) -> Self { Self { client } }
}

impl Sink for ApiSink {
  async fn submit(&self, submission: &Submission) -> Result<(), SinkError> {
    let confirmation = self.client.send_message(submission).await?;
    tracing::info!(id = %confirmation.id, "message accepted by folio api");
    Ok(())
  }
}

// ─── Email relay ──────────────────────────────────────────────────────────────

/// Credentials for an EmailJS-compatible relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRelayConfig {
  pub service_id:  String,
  pub template_id: String,
  pub public_key:  String,
  pub endpoint:    String,
}

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
  service_id:      &'a str,
  template_id:     &'a str,
  user_id:         &'a str,
  template_params: TemplateParams<'a>,
}

#[derive(Debug, Serialize)]
struct TemplateParams<'a> {
  from_name:  &'a str,
  from_email: &'a str,
  subject:    &'a str,
  message:    &'a str,
}

/// Delivers straight to a third-party email relay, bypassing the folio API.
pub struct EmailRelaySink {
  client: Client,
  config: EmailRelayConfig,
}

impl EmailRelaySink {
  pub fn new(config: EmailRelayConfig) -> anyhow::Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  fn request<'a>(&'a self, s: &'a Submission) -> RelayRequest<'a> {
    RelayRequest {
      service_id:      &self.config.service_id,
      template_id:     &self.config.template_id,
      user_id:         &self.config.public_key,
      template_params: TemplateParams {
        from_name:  &s.name,
        from_email: &s.email,
        subject:    &s.subject,
        message:    &s.message,
      },
    }
  }
}

impl Sink for EmailRelaySink {
  async fn submit(&self, submission: &Submission) -> Result<(), SinkError> {
    let resp = self
      .client
      .post(&self.config.endpoint)
      .json(&self.request(submission))
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(SinkError::RelayRejected { status, body });
    }
    tracing::info!(endpoint = %self.config.endpoint, "message accepted by email relay");
    Ok(())
  }
}

// ─── Selection ────────────────────────────────────────────────────────────────

/// The sink chosen by configuration.
pub enum ConfiguredSink {
  Api(ApiSink),
  EmailRelay(EmailRelaySink),
}

impl ConfiguredSink {
  pub fn describe(&self) -> String {
    match self {
      Self::Api(s) => format!("folio api at {}", s.client.base_url()),
      Self::EmailRelay(s) => format!("email relay at {}", s.config.endpoint),
    }
  }
}

impl Sink for ConfiguredSink {
  async fn submit(&self, submission: &Submission) -> Result<(), SinkError> {
    match self {
      Self::Api(s) => s.submit(submission).await,
      Self::EmailRelay(s) => s.submit(submission).await,
    }
  }
}

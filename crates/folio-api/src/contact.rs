//! Handlers for `/contact` endpoints.
//!
//! | Method   | Path            | Notes |
//! |----------|-----------------|-------|
//! | `POST`   | `/contact`      | Body: [`Submission`]; returns 201 + confirmation |
//! | `GET`    | `/contact`      | Newest first, no source addresses |
//! | `GET`    | `/contact/{id}` | Marks the message read; 404 if not found |
//! | `DELETE` | `/contact/{id}` | Permanent; 404 if not found |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use folio_core::{
  envelope::Envelope,
  message::{Confirmation, Message, MessageSummary},
  service::MessageService,
  store::MessageStore,
  submission::Submission,
};
use uuid::Uuid;

use crate::{client_ip::ClientIp, error::ApiError};

pub const CREATED: &str = "Thank you for your message! I will get back to you soon.";
pub const DELETED: &str = "Message deleted successfully";

/// Ids that are not UUIDs cannot name a stored message.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|_| ApiError::message_not_found())
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /contact`, answering 201 + `{id, name, createdAt}`.
pub async fn create<S>(
  State(service): State<MessageService<S>>,
  ClientIp(ip): ClientIp,
  body: Result<Json<Submission>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MessageStore,
{
  let Json(submission) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

  let confirmation: Confirmation = service
    .create_message(submission, &ip)
    .await
    .map_err(|e| {
      if let folio_core::Error::Validation(v) = &e {
        tracing::debug!(%ip, "rejected contact submission: {v}");
      }
      ApiError::from_core(e, "Failed to send message. Please try again later.")
    })?;

  Ok((
    StatusCode::CREATED,
    Json(Envelope::data_with_message(confirmation, CREATED)),
  ))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /contact`
pub async fn list<S>(
  State(service): State<MessageService<S>>,
) -> Result<Json<Envelope<Vec<MessageSummary>>>, ApiError>
where
  S: MessageStore,
{
  let messages = service
    .list_messages()
    .await
    .map_err(|e| ApiError::from_core(e, "Failed to fetch messages"))?;
  Ok(Json(Envelope::list(messages)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /contact/{id}`
pub async fn get_one<S>(
  State(service): State<MessageService<S>>,
  Path(id): Path<String>,
) -> Result<Json<Envelope<Message>>, ApiError>
where
  S: MessageStore,
{
  let id = parse_id(&id)?;
  let message = service
    .get_message(id)
    .await
    .map_err(|e| ApiError::from_core(e, "Failed to fetch message"))?;
  Ok(Json(Envelope::data(message)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /contact/{id}`
pub async fn delete_one<S>(
  State(service): State<MessageService<S>>,
  Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError>
where
  S: MessageStore,
{
  let id = parse_id(&id)?;
  service
    .delete_message(id)
    .await
    .map_err(|e| ApiError::from_core(e, "Failed to delete message"))?;
  Ok(Json(Envelope::ok(DELETED)))
}

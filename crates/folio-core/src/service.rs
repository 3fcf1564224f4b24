//! [`MessageService`]: validation and read-marking on top of a
//! [`MessageStore`].

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  message::{Confirmation, Message, MessageSummary, NewMessage},
  store::MessageStore,
  submission::Submission,
};

/// The four contact operations. Cloning is cheap; the store is shared.
pub struct MessageService<S> {
  store: Arc<S>,
}

impl<S> Clone for MessageService<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: MessageStore> MessageService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Validate `payload` and persist it as an unread message from
  /// `source_ip`. Nothing is written when validation fails.
  pub async fn create_message(
    &self,
    payload: Submission,
    source_ip: &str,
  ) -> Result<Confirmation> {
    let valid = payload.into_valid()?;
    let message = self
      .store
      .insert(NewMessage::new(valid, source_ip))
      .await
      .map_err(Error::store)?;

    tracing::info!(id = %message.id, "stored contact message");
    Ok(Confirmation::from(&message))
  }

  /// All messages, newest first, without source addresses.
  pub async fn list_messages(&self) -> Result<Vec<MessageSummary>> {
    self.store.list_newest_first().await.map_err(Error::store)
  }

  /// Fetch one message, marking it read on the way out.
  pub async fn get_message(&self, id: Uuid) -> Result<Message> {
    let mut message = self
      .store
      .get(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound(id))?;

    if !message.is_read {
      // A concurrent delete can remove the row between the two calls.
      if !self.store.mark_read(id).await.map_err(Error::store)? {
        return Err(Error::NotFound(id));
      }
      message.is_read = true;
    }

    Ok(message)
  }

  pub async fn delete_message(&self, id: Uuid) -> Result<()> {
    if !self.store.delete(id).await.map_err(Error::store)? {
      return Err(Error::NotFound(id));
    }
    tracing::info!(%id, "deleted contact message");
    Ok(())
  }
}

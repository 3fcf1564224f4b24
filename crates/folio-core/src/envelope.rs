//! The JSON envelope every contact endpoint answers with.
//!
//! ```json
//! { "success": true, "message": "...", "count": 2, "data": ... }
//! ```
//!
//! `message`, `count` and `data` are omitted when absent. Failures are always
//! `{ "success": false, "message": "..." }`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub count:   Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
}

impl<T> Envelope<T> {
  pub fn data(data: T) -> Self {
    Self { success: true, message: None, count: None, data: Some(data) }
  }

  /// Success carrying both a human-readable message and a payload.
  pub fn data_with_message(data: T, message: impl Into<String>) -> Self {
    Self {
      success: true,
      message: Some(message.into()),
      count:   None,
      data:    Some(data),
    }
  }
}

impl<T> Envelope<Vec<T>> {
  /// Success carrying a list and its length.
  pub fn list(items: Vec<T>) -> Self {
    Self {
      success: true,
      message: None,
      count:   Some(items.len()),
      data:    Some(items),
    }
  }
}

impl Envelope<()> {
  pub fn ok(message: impl Into<String>) -> Self {
    Self { success: true, message: Some(message.into()), count: None, data: None }
  }

  pub fn failure(message: impl Into<String>) -> Self {
    Self { success: false, message: Some(message.into()), count: None, data: None }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn failure_has_only_success_and_message() {
    let json = serde_json::to_value(Envelope::failure("Message not found")).unwrap();
    assert_eq!(json, serde_json::json!({ "success": false, "message": "Message not found" }));
  }

  #[test]
  fn list_counts_items() {
    let json = serde_json::to_value(Envelope::list(vec![1, 2, 3])).unwrap();
    assert_eq!(json["count"], 3);
    assert!(json.get("message").is_none());
  }

  #[test]
  fn missing_optional_keys_parse() {
    let env: Envelope<Vec<u8>> = serde_json::from_str(r#"{"success":true}"#).unwrap();
    assert!(env.success);
    assert!(env.data.is_none());
  }
}

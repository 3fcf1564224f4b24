//! Submission: the in-progress contact form values held by a client.
//!
//! A submission is never mutated in place. Every edit produces a new
//! snapshot via [`Submission::with_field`], so each state the form passes
//! through can be compared against the previous one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four named form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
  Name,
  Email,
  Subject,
  Message,
}

impl Field {
  /// All fields in form order. Validation reports violations in this order.
  pub const ALL: [Field; 4] =
    [Field::Name, Field::Email, Field::Subject, Field::Message];

  /// The JSON key (and `validator` field name) for this field.
  pub fn key(self) -> &'static str {
    match self {
      Self::Name => "name",
      Self::Email => "email",
      Self::Subject => "subject",
      Self::Message => "message",
    }
  }

  /// The field after this one, wrapping around.
  pub fn next(self) -> Self {
    match self {
      Self::Name => Self::Email,
      Self::Email => Self::Subject,
      Self::Subject => Self::Message,
      Self::Message => Self::Name,
    }
  }

  /// The field before this one, wrapping around.
  pub fn prev(self) -> Self {
    match self {
      Self::Name => Self::Message,
      Self::Email => Self::Name,
      Self::Subject => Self::Email,
      Self::Message => Self::Subject,
    }
  }
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.key())
  }
}

/// Candidate contact form values, as typed by the user.
///
/// Missing JSON keys deserialise as empty strings so that they surface as
/// "required" violations rather than as parse errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
  #[serde(default)]
  pub name:    String,
  #[serde(default)]
  pub email:   String,
  #[serde(default)]
  pub subject: String,
  #[serde(default)]
  pub message: String,
}

impl Submission {
  pub fn new(
    name: impl Into<String>,
    email: impl Into<String>,
    subject: impl Into<String>,
    message: impl Into<String>,
  ) -> Self {
    Self {
      name:    name.into(),
      email:   email.into(),
      subject: subject.into(),
      message: message.into(),
    }
  }

  pub fn get(&self, field: Field) -> &str {
    match field {
      Field::Name => &self.name,
      Field::Email => &self.email,
      Field::Subject => &self.subject,
      Field::Message => &self.message,
    }
  }

  /// Return a new snapshot in which only `field` differs.
  #[must_use]
  pub fn with_field(&self, field: Field, value: impl Into<String>) -> Self {
    let mut next = self.clone();
    let slot = match field {
      Field::Name => &mut next.name,
      Field::Email => &mut next.email,
      Field::Subject => &mut next.subject,
      Field::Message => &mut next.message,
    };
    *slot = value.into();
    next
  }

  /// `true` when every field is empty.
  pub fn is_blank(&self) -> bool {
    Field::ALL.iter().all(|f| self.get(*f).is_empty())
  }

  /// The first field that fails the loose pre-send check: every field must
  /// have non-whitespace content and the email must look like `x@y`. The
  /// server still applies the full rules.
  pub fn first_incomplete(&self) -> Option<Field> {
    Field::ALL.into_iter().find(|&field| {
      let value = self.get(field).trim();
      value.is_empty() || (field == Field::Email && !looks_like_email(value))
    })
  }
}

fn looks_like_email(value: &str) -> bool {
  match value.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !value.contains(char::is_whitespace)
    }
    None => false,
  }
}

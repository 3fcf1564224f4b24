//! The contact form controller.
//!
//! Holds the current [`Submission`] snapshot, the in-flight flag, and the
//! status banner. Sends run on background tasks and report back through a
//! [`FormEvent`] channel that the UI loop drains, so the controller itself
//! is only ever touched from one place.

use std::{sync::Arc, time::Duration};

use folio_core::submission::{Field, Submission};
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};

use crate::sink::{Sink, SinkError};

pub const SENT: &str = "Message sent successfully! I will get back to you soon.";
pub const SEND_FAILED: &str =
  "Failed to send message. Please try again or contact me directly via email.";

/// How long a status banner stays up.
pub const STATUS_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
  Success(String),
  Error(String),
}

impl Status {
  pub fn text(&self) -> &str {
    match self {
      Self::Success(s) | Self::Error(s) => s,
    }
  }
}

/// What [`FormController::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submit {
  Started,
  /// A send is already running; nothing changed.
  InFlight,
  /// The field failed the pre-send check. Nothing was sent.
  Incomplete(Field),
}

/// The banner shown when the pre-send check fails.
pub fn incomplete_message(field: Field, submission: &Submission) -> String {
  if field == Field::Email && !submission.email.trim().is_empty() {
    "Please enter a valid email address".to_string()
  } else {
    format!("Please fill out the {field} field")
  }
}

/// Completions delivered back to the controller.
#[derive(Debug)]
pub enum FormEvent {
  Sent(Result<(), SinkError>),
  /// The dismiss timer for status generation `n` fired.
  DismissStatus(u64),
}

// ─── Dismiss timer ────────────────────────────────────────────────────────────

/// A pending status dismissal. Dropping it cancels the timer.
struct DismissTimer(JoinHandle<()>);

impl DismissTimer {
  fn arm(generation: u64, events: UnboundedSender<FormEvent>) -> Self {
    Self(tokio::spawn(async move {
      tokio::time::sleep(STATUS_TTL).await;
      let _ = events.send(FormEvent::DismissStatus(generation));
    }))
  }
}

impl Drop for DismissTimer {
  fn drop(&mut self) { self.0.abort(); }
}

// ─── Controller ───────────────────────────────────────────────────────────────

pub struct FormController<K> {
  submission:    Submission,
  status:        Option<Status>,
  is_submitting: bool,
  /// Bumped on every status change; a timer only clears its own generation.
  generation:    u64,
  dismiss:       Option<DismissTimer>,
  sink:          Arc<K>,
  events:        UnboundedSender<FormEvent>,
}

impl<K: Sink> FormController<K> {
  pub fn new(sink: Arc<K>, events: UnboundedSender<FormEvent>) -> Self {
    Self {
      submission: Submission::default(),
      status: None,
      is_submitting: false,
      generation: 0,
      dismiss: None,
      sink,
      events,
    }
  }

  pub fn submission(&self) -> &Submission { &self.submission }

  pub fn status(&self) -> Option<&Status> { self.status.as_ref() }

  pub fn is_submitting(&self) -> bool { self.is_submitting }

  /// Replace the submission with a copy in which only `field` changed.
  pub fn update_field(&mut self, field: Field, value: impl Into<String>) {
    self.submission = self.submission.with_field(field, value);
  }

  /// Start sending the current submission. Nothing is sent while another
  /// send is in flight, or while a field is empty or the email is malformed.
  pub fn submit(&mut self) -> Submit {
    if self.is_submitting {
      return Submit::InFlight;
    }
    if let Some(field) = self.submission.first_incomplete() {
      let text = incomplete_message(field, &self.submission);
      self.set_status(Some(Status::Error(text)));
      return Submit::Incomplete(field);
    }
    self.is_submitting = true;
    self.set_status(None);

    let sink = Arc::clone(&self.sink);
    let events = self.events.clone();
    let snapshot = self.submission.clone();
    tokio::spawn(async move {
      let result = sink.submit(&snapshot).await;
      let _ = events.send(FormEvent::Sent(result));
    });
    Submit::Started
  }

  pub fn handle_event(&mut self, event: FormEvent) {
    match event {
      FormEvent::Sent(Ok(())) => {
        self.is_submitting = false;
        self.submission = Submission::default();
        self.set_status(Some(Status::Success(SENT.to_string())));
      }
      FormEvent::Sent(Err(e)) => {
        self.is_submitting = false;
        tracing::error!(error = %e, "failed to send contact message");
        self.set_status(Some(Status::Error(SEND_FAILED.to_string())));
      }
      FormEvent::DismissStatus(generation) => {
        if generation == self.generation {
          self.status = None;
          self.dismiss = None;
        }
      }
    }
  }

  fn set_status(&mut self, status: Option<Status>) {
    self.generation += 1;
    // Replacing the timer drops, and so cancels, the previous one.
    self.dismiss = status
      .is_some()
      .then(|| DismissTimer::arm(self.generation, self.events.clone()));
    self.status = status;
  }
}

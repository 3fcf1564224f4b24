//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use folio_core::{
  message::{Message, MessageSummary},
  submission::Field,
};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::{
  client::ApiClient,
  form::{FormController, FormEvent, Submit},
  sink::Sink,
};

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
  /// The contact form.
  Compose,
  /// Received messages, newest first.
  Inbox,
  /// One message in full.
  MessageDetail,
}

/// Keyboard focus within the compose screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Field(Field),
  Send,
}

impl Focus {
  pub fn next(self) -> Self {
    match self {
      Self::Field(Field::Message) => Self::Send,
      Self::Field(f) => Self::Field(f.next()),
      Self::Send => Self::Field(Field::Name),
    }
  }

  pub fn prev(self) -> Self {
    match self {
      Self::Field(Field::Name) => Self::Send,
      Self::Field(f) => Self::Field(f.prev()),
      Self::Send => Self::Field(Field::Message),
    }
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<K> {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  pub form:  FormController<K>,
  pub focus: Focus,

  /// Messages as last fetched from the API.
  pub messages: Vec<MessageSummary>,

  /// Current fuzzy-filter string (only active when `filter_active`).
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// Cursor position within the *filtered* message list.
  pub list_cursor: usize,

  /// The message open on the detail screen.
  pub detail: Option<Message>,

  /// Scroll offset within the detail body.
  pub detail_scroll: u16,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client for the inbox.
  pub client: ApiClient,
}

impl<K: Sink> App<K> {
  pub fn new(client: ApiClient, sink: Arc<K>, events: UnboundedSender<FormEvent>) -> Self {
    Self {
      screen: Screen::Compose,
      form: FormController::new(sink, events),
      focus: Focus::Field(Field::Name),
      messages: Vec::new(),
      filter: String::new(),
      filter_active: false,
      list_cursor: 0,
      detail: None,
      detail_scroll: 0,
      status_msg: String::new(),
      client,
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch all messages from the API into `self.messages`.
  pub async fn load_messages(&mut self) {
    self.status_msg = "Loading messages…".into();
    match self.client.list_messages().await {
      Ok(messages) => {
        self.messages = messages;
        self.list_cursor = 0;
        self.status_msg = String::new();
      }
      Err(e) => {
        tracing::warn!(error = %e, "failed to load messages");
        self.status_msg = format!("Error: {e}");
      }
    }
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Returns messages whose sender or subject match the filter query.
  pub fn filtered_messages(&self) -> Vec<&MessageSummary> {
    if self.filter.is_empty() {
      return self.messages.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .messages
      .iter()
      .filter(|m| {
        matcher.fuzzy_match(&m.name, &self.filter).is_some()
          || matcher.fuzzy_match(&m.subject, &self.filter).is_some()
      })
      .collect()
  }

  /// The message under the list cursor in the filtered view, if any.
  pub fn cursor_message(&self) -> Option<&MessageSummary> {
    self.filtered_messages().get(self.list_cursor).copied()
  }

  pub fn unread_count(&self) -> usize {
    self.messages.iter().filter(|m| !m.is_read).count()
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    if self.filter_active {
      self.handle_filter_key(key).await;
      return true;
    }

    match self.screen {
      Screen::Compose => self.handle_compose_key(key).await,
      Screen::Inbox => self.handle_inbox_key(key).await,
      Screen::MessageDetail => self.handle_detail_key(key).await,
    }
  }

  /// Route a background completion into the form.
  pub fn handle_form_event(&mut self, event: FormEvent) {
    self.form.handle_event(event);
  }

  async fn handle_compose_key(&mut self, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
      match key.code {
        KeyCode::Char('s') => self.submit(),
        KeyCode::Char('o') => self.open_inbox().await,
        _ => {}
      }
      return true;
    }

    match (key.code, self.focus) {
      (KeyCode::Tab | KeyCode::Down, _) => self.focus = self.focus.next(),
      (KeyCode::BackTab | KeyCode::Up, _) => self.focus = self.focus.prev(),

      (KeyCode::Enter, Focus::Send) => self.submit(),
      (KeyCode::Enter, Focus::Field(Field::Message)) => self.append(Field::Message, '\n'),
      (KeyCode::Enter, Focus::Field(_)) => self.focus = self.focus.next(),

      (KeyCode::Backspace, Focus::Field(field)) => {
        let mut value = self.form.submission().get(field).to_owned();
        value.pop();
        self.form.update_field(field, value);
      }
      (KeyCode::Char(c), Focus::Field(field)) => self.append(field, c),

      _ => {}
    }
    true
  }

  fn submit(&mut self) {
    if let Submit::Incomplete(field) = self.form.submit() {
      self.focus = Focus::Field(field);
    }
  }

  fn append(&mut self, field: Field, c: char) {
    let mut value = self.form.submission().get(field).to_owned();
    value.push(c);
    self.form.update_field(field, value);
  }

  async fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.list_cursor = 0;
        // Immediately open detail if there's exactly one match.
        let list = self.filtered_messages();
        if list.len() == 1 {
          let id = list[0].id;
          drop(list);
          self.open_detail(id).await;
        }
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
  }

  async fn handle_inbox_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Esc | KeyCode::Char('c') => {
        self.screen = Screen::Compose;
        self.status_msg.clear();
      }
      KeyCode::Char('r') => self.load_messages().await,

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_messages().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_message().map(|m| m.id) {
          self.open_detail(id).await;
        }
      }

      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.list_cursor = 0;
      }

      _ => {}
    }
    true
  }

  async fn handle_detail_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => self.close_detail(),

      KeyCode::Down | KeyCode::Char('j') => {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
      }

      KeyCode::Char('d') => self.delete_open_message().await,

      _ => {}
    }
    true
  }

  async fn open_inbox(&mut self) {
    self.screen = Screen::Inbox;
    self.load_messages().await;
  }

  /// Fetch `id` (which marks it read server-side) and show it.
  async fn open_detail(&mut self, id: Uuid) {
    self.status_msg = "Loading…".into();
    match self.client.get_message(id).await {
      Ok(message) => {
        if let Some(summary) = self.messages.iter_mut().find(|m| m.id == id) {
          summary.is_read = message.is_read;
        }
        self.detail = Some(message);
        self.detail_scroll = 0;
        self.status_msg.clear();
        self.screen = Screen::MessageDetail;
      }
      Err(e) => {
        tracing::warn!(%id, error = %e, "failed to open message");
        self.status_msg = format!("Error: {e}");
      }
    }
  }

  fn close_detail(&mut self) {
    self.screen = Screen::Inbox;
    self.detail = None;
  }

  async fn delete_open_message(&mut self) {
    let Some(id) = self.detail.as_ref().map(|m| m.id) else {
      return;
    };
    match self.client.delete_message(id).await {
      Ok(()) => {
        self.messages.retain(|m| m.id != id);
        let len = self.filtered_messages().len();
        self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
        self.close_detail();
        self.status_msg = "Message deleted".into();
      }
      Err(e) => {
        tracing::warn!(%id, error = %e, "failed to delete message");
        self.status_msg = format!("Error: {e}");
      }
    }
  }
}

//! TUI rendering. Lays out the header, the active screen and the status bar.

pub mod compose;
pub mod inbox;
pub mod message_detail;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::{
  app::{App, Screen},
  sink::Sink,
};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<K: Sink>(f: &mut Frame, app: &App<K>) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  match app.screen {
    Screen::Compose => compose::draw(f, rows[1], app),
    Screen::Inbox => inbox::draw(f, rows[1], app),
    Screen::MessageDetail => message_detail::draw(f, rows[1], app),
  }
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<K: Sink>(f: &mut Frame, area: Rect, app: &App<K>) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let tab = |label: String, active: bool| {
    let style = if active {
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::White)
    };
    Span::styled(format!(" {label} "), style)
  };

  let inbox_label = match app.unread_count() {
    0 => "Inbox".to_string(),
    n => format!("Inbox ({n})"),
  };

  let mut left = vec![
    Span::styled(
      " folio ",
      Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    tab("Compose".into(), app.screen == Screen::Compose),
    tab(inbox_label, app.screen != Screen::Compose),
  ];

  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let left_width: usize = left.iter().map(|s| s.content.chars().count()).sum();
  let pad = (area.width as usize)
    .saturating_sub(left_width)
    .saturating_sub(right.content.len());

  left.push(Span::raw(" ".repeat(pad)));
  left.push(right);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(left)), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<K: Sink>(f: &mut Frame, area: Rect, app: &App<K>) {
  let (mode_label, hints) = match &app.screen {
    Screen::Compose => (
      "COMPOSE",
      "Tab/S-Tab field  Enter next  Ctrl-S send  Ctrl-O inbox  Ctrl-C quit",
    ),
    Screen::Inbox if app.filter_active => (
      "SEARCH",
      "Type to filter  Esc cancel  Enter select",
    ),
    Screen::Inbox => (
      "INBOX",
      "↑↓/jk navigate  / search  Enter open  r reload  c compose  q quit",
    ),
    Screen::MessageDetail => (
      "MESSAGE",
      "↑↓/jk scroll  d delete  Esc back  q quit",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

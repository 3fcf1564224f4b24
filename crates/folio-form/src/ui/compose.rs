//! Compose screen, the contact form itself.

use folio_core::submission::Field;
use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
  app::{App, Focus},
  form::Status,
  sink::Sink,
};

/// Render the form into `area`.
pub fn draw<K: Sink>(f: &mut Frame, area: Rect, app: &App<K>) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(3), // name
      Constraint::Length(3), // email
      Constraint::Length(3), // subject
      Constraint::Min(5),    // message
      Constraint::Length(3), // send button
      Constraint::Length(3), // status banner
    ])
    .split(area);

  for (field, row) in Field::ALL.into_iter().zip(rows.iter()) {
    draw_input(f, *row, app, field);
  }
  draw_button(f, rows[4], app);
  draw_banner(f, rows[5], app.form.status());
}

fn label(field: Field) -> &'static str {
  match field {
    Field::Name => "Name",
    Field::Email => "Email",
    Field::Subject => "Subject",
    Field::Message => "Message",
  }
}

fn draw_input<K: Sink>(f: &mut Frame, area: Rect, app: &App<K>, field: Field) {
  let focused = app.focus == Focus::Field(field);
  let border = if focused {
    Style::default().fg(Color::Cyan)
  } else {
    Style::default().fg(Color::DarkGray)
  };

  let mut text = app.form.submission().get(field).to_string();
  if focused {
    text.push('_');
  }

  let block = Block::default()
    .title(format!(" {} ", label(field)))
    .borders(Borders::ALL)
    .border_style(border);

  let mut para = Paragraph::new(text).block(block);
  if field == Field::Message {
    para = para.wrap(Wrap { trim: false });
  }
  f.render_widget(para, area);
}

fn draw_button<K: Sink>(f: &mut Frame, area: Rect, app: &App<K>) {
  let (label, style) = if app.form.is_submitting() {
    ("Sending…", Style::default().fg(Color::DarkGray))
  } else if app.focus == Focus::Send {
    (
      "Send Message",
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    )
  } else {
    ("Send Message", Style::default().fg(Color::White))
  };

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  f.render_widget(
    Paragraph::new(Span::styled(format!(" {label} "), style))
      .alignment(Alignment::Center)
      .block(block),
    area,
  );
}

fn draw_banner(f: &mut Frame, area: Rect, status: Option<&Status>) {
  let Some(status) = status else {
    return;
  };

  let color = match status {
    Status::Success(_) => Color::Green,
    Status::Error(_) => Color::Red,
  };

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(color));
  f.render_widget(
    Paragraph::new(Line::from(Span::styled(
      status.text(),
      Style::default().fg(color),
    )))
    .wrap(Wrap { trim: true })
    .block(block),
    area,
  );
}

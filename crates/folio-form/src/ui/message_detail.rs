//! Message detail pane: one message in full.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{app::App, sink::Sink};

pub fn draw<K: Sink>(f: &mut Frame, area: Rect, app: &App<K>) {
  let Some(message) = &app.detail else {
    f.render_widget(
      Paragraph::new("Select a message and press Enter.")
        .style(Style::default().fg(Color::DarkGray)),
      area,
    );
    return;
  };

  let block = Block::default()
    .title(format!(" {} ", message.subject))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let header = |label: &str, value: String| {
    Line::from(vec![
      Span::styled(
        format!("{label:<10}"),
        Style::default()
          .fg(Color::Cyan)
          .add_modifier(Modifier::BOLD),
      ),
      Span::raw(value),
    ])
  };

  let mut lines = vec![
    header("From", format!("{} <{}>", message.name, message.email)),
    header(
      "Received",
      message
        .created_at
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string(),
    ),
    header("Source", message.ip_address.clone()),
    Line::from(""),
  ];
  lines.extend(message.message.lines().map(|l| Line::from(l.to_string())));

  f.render_widget(
    Paragraph::new(lines)
      .block(block)
      .wrap(Wrap { trim: false })
      .scroll((app.detail_scroll, 0)),
    area,
  );
}

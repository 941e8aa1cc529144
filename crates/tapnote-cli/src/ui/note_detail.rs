//! Note detail pane: the draft editor and the delete confirmation.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{App, Focus};

// ─── Public entry ─────────────────────────────────────────────────────────────

/// Render the draft into `area`.
pub fn draw<P, L>(f: &mut Frame, area: Rect, app: &App<P, L>) {
  let draft = &app.draft;
  let heading = if draft.is_persisted() { draft.title.as_str() } else { "New note" };

  let block = Block::default()
    .title(format!(" {heading} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(3), // title
      Constraint::Min(3),    // text
      Constraint::Length(1), // photo
      Constraint::Length(1), // actions
    ])
    .split(inner);

  draw_field(f, rows[0], "Title", &draft.title, &draft.title_placeholder, app.focus == Focus::Title);
  draw_field(
    f,
    rows[1],
    "Text",
    &draft.text,
    tapnote_core::note::TEXT_PLACEHOLDER,
    app.focus == Focus::Text,
  );
  draw_poster(f, rows[2], app);
  draw_actions(f, rows[3], app);

  if app.confirm_delete {
    draw_confirm(f, area);
  }
}

// ─── Pieces ───────────────────────────────────────────────────────────────────

fn draw_field(f: &mut Frame, area: Rect, label: &str, value: &str, placeholder: &str, focused: bool) {
  let border = if focused { Color::Yellow } else { Color::DarkGray };
  let block = Block::default()
    .title(format!(" {label} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let mut para = if value.is_empty() {
    Paragraph::new(Span::styled(
      placeholder.to_owned(),
      Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    ))
  } else {
    Paragraph::new(value.to_owned())
  };
  if focused {
    para = para.style(Style::default().add_modifier(Modifier::BOLD));
  }
  f.render_widget(para.block(block).wrap(Wrap { trim: false }), area);
}

fn draw_poster<P, L>(f: &mut Frame, area: Rect, app: &App<P, L>) {
  let line = match (&app.draft.poster_blob, app.capture_in_flight) {
    (_, true) => Line::from(Span::styled("Photo: capturing…", Style::default().fg(Color::Yellow))),
    (Some(blob), false) => Line::from(vec![
      Span::styled("Photo: ", Style::default().fg(Color::Cyan)),
      Span::raw(format!("{} ({} bytes)", blob.mime_type, blob.len())),
    ]),
    (None, false) => Line::from(Span::styled("Photo: none", Style::default().fg(Color::DarkGray))),
  };
  f.render_widget(Paragraph::new(line), area);
}

fn draw_actions<P, L>(f: &mut Frame, area: Rect, app: &App<P, L>) {
  let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
  let mut spans = vec![
    Span::styled("[^S] ", key),
    Span::raw(if app.draft.is_persisted() { "Update" } else { "Save" }),
    Span::raw("  "),
    Span::styled("[^P] ", key),
    Span::raw("Photo"),
    Span::raw("  "),
    Span::styled("[Esc] ", key),
    Span::raw("Cancel"),
  ];
  if app.draft.is_persisted() {
    spans.push(Span::raw("  "));
    spans.push(Span::styled("[^D] ", key.fg(Color::Red)));
    spans.push(Span::raw("Delete"));
  }
  f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_confirm(f: &mut Frame, area: Rect) {
  let [row] = Layout::vertical([Constraint::Length(5)]).flex(Flex::Center).areas(area);
  let [popup] = Layout::horizontal([Constraint::Length(40)]).flex(Flex::Center).areas(row);

  let block = Block::default()
    .title(" Delete note ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));
  let text = vec![
    Line::from("Are you sure you want to delete?"),
    Line::from(""),
    Line::from(Span::styled("[y] delete   [n] keep", Style::default().fg(Color::DarkGray))),
  ];

  f.render_widget(Clear, popup);
  f.render_widget(Paragraph::new(text).block(block), popup);
}

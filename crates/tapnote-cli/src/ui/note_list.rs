//! Note list pane.

use chrono::{Local, TimeZone};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState},
};
use tapnote_core::note::Note;

use crate::app::{App, Screen};

/// Render the note list into `area`.
pub fn draw<P, L>(f: &mut Frame, area: Rect, app: &App<P, L>) {
  let border = if app.screen == Screen::NoteList { Color::Cyan } else { Color::DarkGray };
  let block = Block::default()
    .title(format!(" Notes ({}) ", app.notes.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let items: Vec<ListItem> = app.notes.iter().map(list_item).collect();

  let mut state = ListState::default();
  state.select((!app.notes.is_empty()).then_some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items).block(block).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    area,
    &mut state,
  );
}

fn list_item(note: &Note) -> ListItem<'static> {
  let marker = if note.poster_blob.is_some() { "▣ " } else { "  " };
  ListItem::new(Line::from(vec![
    Span::styled(marker, Style::default().fg(Color::Yellow)),
    Span::raw(note.title.clone()),
    Span::styled(format!("  {}", format_time_stamp(note.time_stamp)), Style::default().fg(Color::DarkGray)),
  ]))
}

/// Local date and time of a millisecond time stamp.
fn format_time_stamp(millis: i64) -> String {
  Local
    .timestamp_millis_opt(millis)
    .single()
    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
    .unwrap_or_default()
}

//! TUI rendering: header, list and detail panes, status bar.

pub mod note_detail;
pub mod note_list;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<P, L>(f: &mut Frame, app: &App<P, L>) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<P, L>(f: &mut Frame, area: Rect, app: &App<P, L>) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    format!(" TapNote  {} notes", app.notes.len()),
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);
  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body<P, L>(f: &mut Frame, area: Rect, app: &App<P, L>) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
    .split(area);

  note_list::draw(f, cols[0], app);

  match app.screen {
    Screen::NoteDetail => note_detail::draw(f, cols[1], app),
    Screen::NoteList => draw_empty_detail(f, cols[1], app),
  }
}

fn draw_empty_detail<P, L>(f: &mut Frame, area: Rect, app: &App<P, L>) {
  let block = Block::default()
    .title(" Note ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let hint = if app.notes.is_empty() {
    "No notes yet. Press a to add one."
  } else {
    "Select a note and press Enter, or press a to add one."
  };
  f.render_widget(
    Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
    inner,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<P, L>(f: &mut Frame, area: Rect, app: &App<P, L>) {
  let (mode_label, hints) = match app.screen {
    Screen::NoteList => ("LIST", "↑↓/jk navigate  Enter open  a add  q quit"),
    Screen::NoteDetail if app.confirm_delete => ("DELETE", "y confirm  n/Esc keep"),
    Screen::NoteDetail if app.draft.is_persisted() => (
      "EDIT",
      "Tab switch field  ^S update  ^P photo  ^D delete  Esc back",
    ),
    Screen::NoteDetail => ("ADD", "Tab switch field  ^S save  ^P photo  Esc back"),
  };

  let (status, status_style) = if app.status_msg.is_empty() {
    (hints.to_owned(), Style::default().fg(Color::DarkGray))
  } else if app.status_msg.starts_with("Error") {
    (app.status_msg.clone(), Style::default().fg(Color::Red))
  } else {
    (app.status_msg.clone(), Style::default().fg(Color::Gray))
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let line = Line::from(vec![mode_span, Span::styled(format!("  {status}"), status_style)]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

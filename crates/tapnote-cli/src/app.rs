//! Application state machine and event dispatcher.
//!
//! Two screens: the note list and the note detail. The detail screen edits a
//! [`Draft`]; saving and deleting go through [`NoteDb`], whose callbacks post
//! the refreshed list back as [`AppEvent`]s. Background work (photo capture,
//! title suggestion) also reports back through events, tagged with the draft
//! epoch so results for a draft that is no longer open are dropped.

use std::sync::Arc;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;
use tapnote_core::note::{Blob, Draft, Note};
use tapnote_media::Picker;
use tapnote_store_sqlite::{NoteDb, NoteDbCallbacks, error::Error as StoreError};
use tokio::sync::mpsc;

use crate::{client::Geocoder, location::Locator};

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  NoteList,
  NoteDetail,
}

/// Which detail field receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Title,
  Text,
}

// ─── Events ───────────────────────────────────────────────────────────────────

/// Results delivered to the controller from callbacks and background tasks.
#[derive(Debug)]
pub enum AppEvent {
  ClearList,
  RenderList(Vec<Note>),
  StoreError(String),
  TitleSuggestion { epoch: u64, address: String },
  Photo { epoch: u64, result: tapnote_media::Result<Blob> },
}

/// External collaborators the controller drives.
pub struct Services<P, L> {
  pub picker:   P,
  pub locator:  L,
  /// `None` disables title suggestions.
  pub geocoder: Option<Geocoder>,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<P, L> {
  pub screen: Screen,

  /// Notes as last rendered by the store, newest first.
  pub notes: Vec<Note>,

  /// Cursor position within `notes`.
  pub list_cursor: usize,

  /// The note open in the detail screen.
  pub draft: Draft,

  pub focus: Focus,

  /// The delete confirmation dialog is showing.
  pub confirm_delete: bool,

  /// A photo capture is in progress.
  pub capture_in_flight: bool,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Bumped whenever `draft` is replaced.
  draft_epoch: u64,

  db:        NoteDb,
  picker:    Arc<P>,
  locator:   Arc<L>,
  geocoder:  Option<Geocoder>,
  events_tx: mpsc::UnboundedSender<AppEvent>,
  events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl<P, L> App<P, L>
where
  P: Picker + 'static,
  L: Locator + 'static,
{
  /// Create an [`App`] over a store described by `db_options` (see
  /// [`tapnote_store_sqlite::NoteDbOptions`]). The store is not opened yet.
  pub fn new(db_options: Value, services: Services<P, L>) -> Self {
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let (clear_tx, render_tx, error_tx) = (events_tx.clone(), events_tx.clone(), events_tx.clone());
    let callbacks = NoteDbCallbacks {
      clear_list:  Box::new(move || {
        let _ = clear_tx.send(AppEvent::ClearList);
      }),
      render_list: Box::new(move |notes| {
        let _ = render_tx.send(AppEvent::RenderList(notes));
      }),
      on_error:    Box::new(move |e: &StoreError| {
        tracing::error!("note store error: {e}");
        let _ = error_tx.send(AppEvent::StoreError(e.to_string()));
      }),
    };

    Self {
      screen: Screen::NoteList,
      notes: Vec::new(),
      list_cursor: 0,
      draft: Draft::empty(),
      focus: Focus::Title,
      confirm_delete: false,
      capture_in_flight: false,
      status_msg: String::new(),
      draft_epoch: 0,
      db: NoteDb::new(db_options, callbacks),
      picker: Arc::new(services.picker),
      locator: Arc::new(services.locator),
      geocoder: services.geocoder,
      events_tx,
      events_rx,
    }
  }

  /// Open the store; the initial list arrives as events.
  pub async fn open_store(&mut self, version: u32) {
    self.status_msg = "Loading notes…".into();
    self.db.open(version).await;
    self.process_pending_events();
    if self.db.is_open() && self.status_msg.starts_with("Loading") {
      self.status_msg.clear();
    }
  }

  /// Add mode shows "Save"; edit mode shows "Update" and allows delete.
  pub fn is_new_note(&self) -> bool { !self.draft.is_persisted() }

  // ── Events ────────────────────────────────────────────────────────────────

  /// Apply every event that has arrived so far.
  pub fn process_pending_events(&mut self) {
    while let Ok(event) = self.events_rx.try_recv() {
      self.handle_event(event);
    }
  }

  /// Wait for the next event and apply it.
  pub async fn next_event(&mut self) -> Option<()> {
    let event = self.events_rx.recv().await?;
    self.handle_event(event);
    Some(())
  }

  pub fn handle_event(&mut self, event: AppEvent) {
    match event {
      AppEvent::ClearList => self.notes.clear(),
      AppEvent::RenderList(notes) => {
        self.notes = notes;
        self.list_cursor = self.list_cursor.min(self.notes.len().saturating_sub(1));
      }
      AppEvent::StoreError(msg) => self.status_msg = format!("Error: {msg}"),
      AppEvent::TitleSuggestion { epoch, address } => {
        if epoch != self.draft_epoch {
          tracing::debug!("dropping title suggestion for a closed draft");
        } else if !self.draft.suggest_title(&address) {
          tracing::debug!("title already typed; suggestion discarded");
        }
      }
      AppEvent::Photo { epoch, result } => {
        self.capture_in_flight = false;
        match result {
          Ok(blob) if epoch == self.draft_epoch => {
            self.status_msg = format!("Photo attached ({} bytes)", blob.len());
            self.draft.poster_blob = Some(blob);
          }
          Ok(_) => tracing::debug!("dropping photo for a closed draft"),
          Err(e) if e.is_cancelled() => tracing::debug!("photo capture cancelled"),
          Err(e) => {
            tracing::warn!("photo capture failed: {e}");
            self.status_msg = format!("Error: {e}");
          }
        }
      }
    }
  }

  // ── Transitions ───────────────────────────────────────────────────────────

  /// List → detail with an empty draft, and start a title suggestion.
  pub fn open_new(&mut self) {
    self.replace_draft(Draft::empty());
    self.screen = Screen::NoteDetail;
    self.request_title_suggestion();
  }

  /// List → detail for the note at `index`.
  pub fn open_existing(&mut self, index: usize) {
    let Some(note) = self.notes.get(index).cloned() else { return };
    tracing::debug!(time_stamp = note.time_stamp, "opening note");
    self.replace_draft(Draft::from_note(note));
    self.screen = Screen::NoteDetail;
  }

  /// Detail → list, discarding the draft.
  pub fn cancel(&mut self) { self.show_list(); }

  /// Upsert the draft, then return to the list.
  pub async fn save(&mut self) {
    let note = self.draft.commit(Utc::now().timestamp_millis());
    self.db.update(note).await;
    self.show_list();
  }

  pub fn request_delete(&mut self) { self.confirm_delete = true; }

  pub fn dismiss_delete(&mut self) { self.confirm_delete = false; }

  /// Delete the draft's record and return to the list. A draft that was
  /// never saved is rejected and the detail screen stays open.
  pub async fn confirm_delete(&mut self) -> tapnote_core::Result<()> {
    self.confirm_delete = false;
    let time_stamp = self.draft.identity().inspect_err(|e| {
      tracing::warn!("delete rejected: {e}");
      self.status_msg = format!("Error: {e}");
    })?;

    self.db.delete(time_stamp).await;
    self.show_list();
    Ok(())
  }

  /// Start the photo pipeline unless one is already running.
  pub fn capture_photo(&mut self) {
    if self.capture_in_flight {
      return;
    }
    self.capture_in_flight = true;

    let picker = Arc::clone(&self.picker);
    let tx = self.events_tx.clone();
    let epoch = self.draft_epoch;
    tokio::spawn(async move {
      let result = tapnote_media::capture_and_resize(&*picker).await;
      let _ = tx.send(AppEvent::Photo { epoch, result });
    });
  }

  fn show_list(&mut self) {
    self.screen = Screen::NoteList;
    self.confirm_delete = false;
    self.replace_draft(Draft::empty());
  }

  fn replace_draft(&mut self, draft: Draft) {
    self.draft = draft;
    self.draft_epoch += 1;
    self.focus = Focus::Title;
    self.status_msg.clear();
  }

  fn request_title_suggestion(&self) {
    let geocoder = self.geocoder.clone();
    let locator = Arc::clone(&self.locator);
    let tx = self.events_tx.clone();
    let epoch = self.draft_epoch;

    tokio::spawn(async move {
      let position = match locator.locate().await {
        Ok(p) => p,
        Err(e) => {
          tracing::warn!("{e}");
          return;
        }
      };
      tracing::info!(
        latitude = position.latitude,
        longitude = position.longitude,
        "located device"
      );

      let Some(geocoder) = geocoder else {
        tracing::debug!("no geocode API key configured; skipping title suggestion");
        return;
      };
      match geocoder.reverse(position).await {
        Ok(Some(address)) => {
          tracing::info!(%address, "current address");
          let _ = tx.send(AppEvent::TitleSuggestion { epoch, address });
        }
        Ok(None) => tracing::info!("reverse geocoding found nothing"),
        Err(e) => tracing::warn!("reverse geocoding failed: {e}"),
      }
    });
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match self.screen {
      Screen::NoteList => Ok(self.handle_list_key(key)),
      Screen::NoteDetail if self.confirm_delete => {
        self.handle_confirm_key(key).await;
        Ok(true)
      }
      Screen::NoteDetail => {
        self.handle_detail_key(key).await;
        Ok(true)
      }
    }
  }

  fn handle_list_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Down | KeyCode::Char('j') => {
        if self.list_cursor + 1 < self.notes.len() {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => self.open_existing(self.list_cursor),
      KeyCode::Char('a') => self.open_new(),

      _ => {}
    }
    true
  }

  async fn handle_confirm_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('y') | KeyCode::Enter => {
        // A rejected delete is already in the status bar.
        let _ = self.confirm_delete().await;
      }
      KeyCode::Char('n') | KeyCode::Esc => self.dismiss_delete(),
      _ => {}
    }
  }

  async fn handle_detail_key(&mut self, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
      match key.code {
        KeyCode::Char('s') => self.save().await,
        KeyCode::Char('d') => self.request_delete(),
        KeyCode::Char('p') => self.capture_photo(),
        _ => {}
      }
      return;
    }

    match key.code {
      KeyCode::Esc => self.cancel(),
      KeyCode::Tab | KeyCode::BackTab => {
        self.focus = match self.focus {
          Focus::Title => Focus::Text,
          Focus::Text => Focus::Title,
        };
      }
      KeyCode::Enter if self.focus == Focus::Title => self.focus = Focus::Text,
      code => self.edit_focused(code),
    }
  }

  fn edit_focused(&mut self, code: KeyCode) {
    let field = match self.focus {
      Focus::Title => &mut self.draft.title,
      Focus::Text => &mut self.draft.text,
    };
    match code {
      KeyCode::Enter => field.push('\n'),
      KeyCode::Backspace => {
        field.pop();
      }
      KeyCode::Char(c) => field.push(c),
      _ => {}
    }
  }
}

#[cfg(test)]
mod tests;

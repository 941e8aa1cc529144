//! [`NoteDb`], the callback-driven persistence helper the UI talks to.
//!
//! Every operation is fire-and-forget: it returns `()`, successful mutations
//! are followed by a full re-list, and failures surface only through the
//! shared error callback. A re-list first calls `clear_list` and then
//! `render_list`, so the caller can tear down old rows before building new
//! ones.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tapnote_core::{note::Note, options::fallback_options, store::NoteStore};

use crate::{Error, SqliteStore, StoreSchema};

// ─── Options ─────────────────────────────────────────────────────────────────

/// Naming of the store, merged over [`NoteDbOptions::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDbOptions {
  pub db_name:     String,
  pub store_name:  String,
  pub primary_key: String,
  /// Directory holding `{db_name}.sqlite3`. `None` keeps the store in memory.
  pub data_dir:    Option<PathBuf>,
}

impl Default for NoteDbOptions {
  fn default() -> Self {
    Self {
      db_name:     "notes".into(),
      store_name:  "note".into(),
      primary_key: "timeStamp".into(),
      data_dir:    None,
    }
  }
}

// ─── Callbacks ───────────────────────────────────────────────────────────────

pub type RenderListFn = Box<dyn Fn(Vec<Note>) + Send + Sync>;
pub type ClearListFn = Box<dyn Fn() + Send + Sync>;
pub type ErrorFn = Box<dyn Fn(&Error) + Send + Sync>;

pub struct NoteDbCallbacks {
  pub render_list: RenderListFn,
  pub clear_list:  ClearListFn,
  pub on_error:    ErrorFn,
}

impl Default for NoteDbCallbacks {
  fn default() -> Self {
    Self {
      render_list: Box::new(|_| ()),
      clear_list:  Box::new(|| ()),
      on_error:    Box::new(|e: &Error| tracing::error!("note store error: {e}")),
    }
  }
}

// ─── Helper ──────────────────────────────────────────────────────────────────

pub struct NoteDb {
  options:   NoteDbOptions,
  callbacks: NoteDbCallbacks,
  store:     Option<SqliteStore>,
}

impl NoteDb {
  /// Build a helper from loosely-typed `options`. Malformed options are
  /// reported through `on_error` and the defaults are used instead.
  pub fn new(options: Value, callbacks: NoteDbCallbacks) -> Self {
    let defaults = NoteDbOptions::default();
    let options = fallback_options(options, &defaults).unwrap_or_else(|e| {
      (callbacks.on_error)(&Error::Core(e));
      defaults
    });
    Self { options, callbacks, store: None }
  }

  pub fn options(&self) -> &NoteDbOptions { &self.options }

  pub fn is_open(&self) -> bool { self.store.is_some() }

  /// Open (creating if needed) the store at `version`, then list it.
  pub async fn open(&mut self, version: u32) {
    match self.open_store(version).await {
      Ok(store) => {
        self.store = Some(store);
        tracing::info!(db = %self.options.db_name, "The db just opened.");
        self.list().await;
      }
      Err(e) => self.report(&e),
    }
  }

  async fn open_store(&self, version: u32) -> crate::Result<SqliteStore> {
    let schema = StoreSchema::new(&self.options.store_name, &self.options.primary_key)?;
    match &self.options.data_dir {
      Some(dir) => {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(format!("{}.sqlite3", self.options.db_name));
        SqliteStore::open(path, schema, version).await
      }
      None => SqliteStore::open_in_memory(schema, version).await,
    }
  }

  /// Insert or replace `note`, then re-list.
  pub async fn update(&self, note: Note) {
    let Some(store) = self.store_or_report() else { return };
    let time_stamp = note.time_stamp;
    match store.put(note).await {
      Ok(()) => self.list().await,
      Err(e) => {
        tracing::warn!(time_stamp, "error updating note");
        self.report(&e);
      }
    }
  }

  /// Remove the note keyed by `time_stamp`, then re-list.
  pub async fn delete(&self, time_stamp: i64) {
    let Some(store) = self.store_or_report() else { return };
    match store.delete(time_stamp).await {
      Ok(()) => self.list().await,
      Err(e) => {
        tracing::warn!(time_stamp, "error deleting note");
        self.report(&e);
      }
    }
  }

  /// Read every note, newest first, and hand them to the render callback
  /// once the read has completed.
  pub async fn list(&self) {
    let Some(store) = self.store_or_report() else { return };
    match store.list().await {
      Ok(notes) => {
        tracing::debug!(count = notes.len(), "listed notes");
        (self.callbacks.clear_list)();
        (self.callbacks.render_list)(notes);
      }
      Err(e) => self.report(&e),
    }
  }

  fn store_or_report(&self) -> Option<&SqliteStore> {
    if self.store.is_none() {
      self.report(&Error::NotOpen);
    }
    self.store.as_ref()
  }

  fn report(&self, error: &Error) { (self.callbacks.on_error)(error) }
}

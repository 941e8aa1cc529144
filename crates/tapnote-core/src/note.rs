//! The note, the sole persisted entity, and the in-memory draft.
//!
//! A [`Note`] is what the store holds. A [`Draft`] is what the detail view
//! edits: it may or may not have been saved yet, which is tracked by whether
//! it carries a time stamp.

use bytes::Bytes;

use crate::{Error, Result};

/// Title shown (and saved) when the user leaves the title empty.
pub const TITLE_PLACEHOLDER: &str = "Note";

/// Hint shown in an empty text field.
pub const TEXT_PLACEHOLDER: &str = "...";

/// Prefix used for titles suggested from the device location.
pub const SUGGESTED_TITLE_PREFIX: &str = "Note from ";

// ─── Blob ────────────────────────────────────────────────────────────────────

/// A binary payload tagged with its MIME type.
///
/// Cloning is cheap; the bytes are reference-counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
  pub mime_type: String,
  pub data:      Bytes,
}

impl Blob {
  pub fn new(mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
    Self { mime_type: mime_type.into(), data: data.into() }
  }

  pub fn len(&self) -> usize { self.data.len() }

  pub fn is_empty(&self) -> bool { self.data.is_empty() }
}

// ─── Note ────────────────────────────────────────────────────────────────────

/// A persisted note. `time_stamp` (milliseconds since the Unix epoch) is the
/// primary key and never changes once assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
  pub title:       String,
  pub text:        String,
  pub poster_blob: Option<Blob>,
  pub time_stamp:  i64,
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// The note currently open in the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
  pub title:             String,
  pub text:              String,
  pub poster_blob:       Option<Blob>,
  /// `None` until the draft is saved for the first time.
  pub time_stamp:        Option<i64>,
  pub title_placeholder: String,
}

impl Default for Draft {
  fn default() -> Self { Self::empty() }
}

impl Draft {
  pub fn empty() -> Self {
    Self {
      title:             String::new(),
      text:              String::new(),
      poster_blob:       None,
      time_stamp:        None,
      title_placeholder: TITLE_PLACEHOLDER.to_owned(),
    }
  }

  /// Hydrate a draft from a stored note.
  pub fn from_note(note: Note) -> Self {
    Self {
      title:             note.title,
      text:              note.text,
      poster_blob:       note.poster_blob,
      time_stamp:        Some(note.time_stamp),
      title_placeholder: TITLE_PLACEHOLDER.to_owned(),
    }
  }

  pub fn is_persisted(&self) -> bool { self.time_stamp.is_some() }

  /// The primary key of the draft, or [`Error::MissingIdentity`] if it has
  /// never been saved.
  pub fn identity(&self) -> Result<i64> {
    self.time_stamp.ok_or(Error::MissingIdentity)
  }

  /// Build the record to upsert.
  ///
  /// An empty title falls back to the placeholder. A new draft takes
  /// `now_millis` as its key and keeps it, so saving it again updates the
  /// same record.
  pub fn commit(&mut self, now_millis: i64) -> Note {
    let time_stamp = *self.time_stamp.get_or_insert(now_millis);
    let title = if self.title.is_empty() {
      self.title_placeholder.clone()
    } else {
      self.title.clone()
    };

    Note {
      title,
      text: self.text.clone(),
      poster_blob: self.poster_blob.clone().filter(|b| !b.is_empty()),
      time_stamp,
    }
  }

  /// Offer a location-derived title. Applied only while the user has not
  /// typed a title; returns whether the placeholder changed.
  pub fn suggest_title(&mut self, formatted_address: &str) -> bool {
    if !self.title.is_empty() {
      return false;
    }
    self.title_placeholder = format!("{SUGGESTED_TITLE_PREFIX}{formatted_address}");
    true
  }
}

//! Conversions between [`Note`] and the column values stored in SQLite.
//!
//! A poster is stored as two columns: its MIME type and its raw bytes. Both
//! are NULL for text-only notes.

use tapnote_core::note::{Blob, Note};

const FALLBACK_MIME: &str = "application/octet-stream";

pub fn encode_poster(poster: Option<&Blob>) -> (Option<String>, Option<Vec<u8>>) {
  match poster {
    Some(blob) if !blob.is_empty() => (Some(blob.mime_type.clone()), Some(blob.data.to_vec())),
    _ => (None, None),
  }
}

/// Raw values read directly from a note row.
pub struct RawNote {
  pub time_stamp:  i64,
  pub title:       String,
  pub text:        String,
  pub poster_type: Option<String>,
  pub poster:      Option<Vec<u8>>,
}

impl RawNote {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      time_stamp:  row.get(0)?,
      title:       row.get(1)?,
      text:        row.get(2)?,
      poster_type: row.get(3)?,
      poster:      row.get(4)?,
    })
  }

  pub fn into_note(self) -> Note {
    let poster_blob = self.poster.filter(|data| !data.is_empty()).map(|data| {
      Blob::new(self.poster_type.unwrap_or_else(|| FALLBACK_MIME.to_owned()), data)
    });

    Note {
      title: self.title,
      text: self.text,
      poster_blob,
      time_stamp: self.time_stamp,
    }
  }
}

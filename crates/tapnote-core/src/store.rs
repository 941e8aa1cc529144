//! The `NoteStore` trait.
//!
//! Implemented by storage backends (e.g. `tapnote-store-sqlite`). The
//! callback-driven persistence helper and the tests are written against this
//! abstraction.

use std::future::Future;

use crate::note::Note;

/// Abstraction over a local transactional note store keyed by time stamp.
///
/// Each method runs in its own transaction. Implementations must serialise
/// transactions against the same collection.
pub trait NoteStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert `note`, or replace the record with the same time stamp.
  fn put(&self, note: Note) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove the record keyed by `time_stamp`. Removing a missing key is not
  /// an error.
  fn delete(&self, time_stamp: i64)
  -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All records with a non-negative key, newest first.
  fn list(&self) -> impl Future<Output = Result<Vec<Note>, Self::Error>> + Send + '_;
}

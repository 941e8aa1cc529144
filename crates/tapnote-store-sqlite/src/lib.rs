//! SQLite backend for TapNote.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! connection thread without blocking the async runtime. That thread also
//! serialises every transaction against the store.

mod encode;
mod schema;
mod store;

pub mod db;
pub mod error;

pub use db::{NoteDb, NoteDbCallbacks, NoteDbOptions};
pub use error::{Error, Result};
pub use schema::StoreSchema;
pub use store::SqliteStore;

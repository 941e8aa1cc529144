//! Error type for `tapnote-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] tapnote_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid schema: {0}")]
  InvalidSchema(String),

  /// The requested version is older than the one on disk.
  #[error("requested version {requested} is lower than the stored version {current}")]
  VersionTooLow { requested: u32, current: u32 },

  /// `PRAGMA user_version` is a signed 32-bit integer.
  #[error("version {0} does not fit the schema version header")]
  VersionOutOfRange(u32),

  #[error("the store has not been opened")]
  NotOpen,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Error types for `tapnote-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The draft has never been saved, so there is no key to act on.
  #[error("cannot delete a note that has never been saved")]
  MissingIdentity,

  #[error("invalid options: {0}")]
  Options(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Error types for `tapnote-media`.

use thiserror::Error;

use crate::picker::PickError;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Pick(#[from] PickError),

  #[error("malformed data URI: {0}")]
  MalformedDataUri(String),

  #[error("base64 error: {0}")]
  Base64(#[from] base64::DecodeError),

  #[error("image error: {0}")]
  Image(#[from] image::ImageError),

  #[error("resize task failed: {0}")]
  Task(#[from] tokio::task::JoinError),
}

impl Error {
  /// Whether the user backed out of the picker. Callers treat this as a
  /// no-op rather than a failure.
  pub fn is_cancelled(&self) -> bool { matches!(self, Self::Pick(PickError::Cancelled)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

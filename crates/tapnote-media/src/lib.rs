//! Photo handling for TapNote: picking an image, downscaling it, and the
//! data-URI codec the resize step encodes through.

pub mod data_uri;
pub mod error;
pub mod picker;
pub mod resize;

pub use error::{Error, Result};
pub use picker::{CommandPicker, PickError, PickRequest, Picker};

use tapnote_core::note::Blob;

/// Ask `picker` for an image.
pub async fn capture_photo<P>(picker: &P) -> Result<Blob, PickError>
where
  P: Picker + ?Sized,
{
  picker.pick(&PickRequest::images()).await
}

/// Pick an image and downscale it. Resizing runs on the blocking pool.
pub async fn capture_and_resize<P>(picker: &P) -> Result<Blob>
where
  P: Picker + ?Sized,
{
  let picked = capture_photo(picker).await?;
  tracing::debug!(mime = %picked.mime_type, bytes = picked.len(), "picked image");

  let resized = tokio::task::spawn_blocking(move || resize::resize_blob(&picked)).await??;
  tracing::info!(bytes = resized.len(), "resized image");
  Ok(resized)
}

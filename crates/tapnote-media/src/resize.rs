//! Client-side downscaling of picked photos.
//!
//! Images wider than [`MAX_WIDTH`] are scaled down to that width, height
//! scaled by the same ratio. Everything is re-encoded as JPEG at
//! [`JPEG_QUALITY`].

use image::{DynamicImage, codecs::jpeg::JpegEncoder, imageops::FilterType};
use tapnote_core::note::Blob;

use crate::{
  Result,
  data_uri::{blob_from_data_uri, to_data_uri},
};

pub const MAX_WIDTH: u32 = 300;

/// Equivalent of a 0.6 compression ratio.
pub const JPEG_QUALITY: u8 = 60;

pub const OUTPUT_MIME: &str = "image/jpeg";

/// Target dimensions for an image of `width` × `height`.
pub fn scaled_dimensions(width: u32, height: u32) -> (u32, u32) {
  if width <= MAX_WIDTH {
    return (width, height);
  }
  let ratio = f64::from(MAX_WIDTH) / f64::from(width);
  let scaled_height = (f64::from(height) * ratio) as u32;
  (MAX_WIDTH, scaled_height.max(1))
}

/// Decode `blob`, downscale it if needed, and re-encode it as JPEG.
pub fn resize_blob(blob: &Blob) -> Result<Blob> {
  let decoded = image::load_from_memory(&blob.data)?;
  let (width, height) = scaled_dimensions(decoded.width(), decoded.height());

  let sized = if (width, height) == (decoded.width(), decoded.height()) {
    decoded
  } else {
    decoded.resize_exact(width, height, FilterType::Triangle)
  };

  // JPEG has no alpha channel.
  let rgb = DynamicImage::ImageRgb8(sized.to_rgb8());
  let mut encoded = Vec::new();
  rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY))?;

  blob_from_data_uri(&to_data_uri(&Blob::new(OUTPUT_MIME, encoded)))
}

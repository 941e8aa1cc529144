//! Data-URI ⇄ [`Blob`] codec.
//!
//! `data:<mime>[;base64],<payload>`. Base64 payloads are decoded as such,
//! anything else is treated as percent-encoded text.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use tapnote_core::note::Blob;

use crate::{Error, Result};

/// Decode a data URI into a [`Blob`] carrying the URI's MIME type.
pub fn blob_from_data_uri(uri: &str) -> Result<Blob> {
  let rest = uri
    .strip_prefix("data:")
    .ok_or_else(|| Error::MalformedDataUri("missing `data:` scheme".into()))?;
  let (header, payload) = rest
    .split_once(',')
    .ok_or_else(|| Error::MalformedDataUri("missing `,` separator".into()))?;

  let mime_type = header.split(';').next().unwrap_or_default();
  let data = if header.contains("base64") {
    STANDARD.decode(payload.trim())?
  } else {
    percent_decode(payload)
  };

  Ok(Blob::new(mime_type, data))
}

/// Encode `blob` as a base64 data URI.
pub fn to_data_uri(blob: &Blob) -> String {
  format!("data:{};base64,{}", blob.mime_type, STANDARD.encode(&blob.data))
}

/// `%XX` escapes become bytes; malformed escapes are kept verbatim.
fn percent_decode(s: &str) -> Vec<u8> {
  let bytes = s.as_bytes();
  let mut out = Vec::with_capacity(bytes.len());
  let mut i = 0;
  while i < bytes.len() {
    if bytes[i] == b'%'
      && let (Some(hi), Some(lo)) = (
        bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16)),
        bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16)),
      )
    {
      out.push((hi * 16 + lo) as u8);
      i += 3;
      continue;
    }
    out.push(bytes[i]);
    i += 1;
  }
  out
}

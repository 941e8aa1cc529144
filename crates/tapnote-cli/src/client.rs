//! HTTP JSON fetch helper and the reverse-geocoding client built on it.

use std::time::Duration;

use anyhow::Context as _;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{config::GeocodeConfig, location::Position};

#[derive(Debug, Error)]
pub enum FetchError {
  #[error("network error: {0}")]
  Network(#[from] reqwest::Error),

  #[error("HTTP {status} {status_text}")]
  Http { status: u16, status_text: String },

  #[error("malformed JSON body: {0}")]
  Parse(#[from] serde_json::Error),
}

/// `GET url` and parse the body as JSON. Anything but a 200 is an error.
pub async fn fetch_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, FetchError> {
  get_json(client, url).await.inspect_err(|e| {
    // The query string may carry an API key.
    let endpoint = url.split('?').next().unwrap_or_default();
    tracing::warn!(endpoint, "fetching JSON failed: {e}");
  })
}

async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, FetchError> {
  let resp = client.get(url).send().await?;

  let status = resp.status();
  if status != StatusCode::OK {
    return Err(FetchError::Http {
      status:      status.as_u16(),
      status_text: status.canonical_reason().unwrap_or_default().to_owned(),
    });
  }

  let body = resp.text().await?;
  Ok(serde_json::from_str(&body)?)
}

// ─── Reverse geocoding ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
  #[serde(default)]
  results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
  formatted_address: String,
}

/// Turns a position into a human-readable address.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct Geocoder {
  client:   Client,
  base_url: String,
  api_key:  String,
}

impl Geocoder {
  pub fn new(config: &GeocodeConfig) -> anyhow::Result<Self> {
    let mut builder = Client::builder();
    if config.timeout_secs > 0 {
      builder = builder.timeout(Duration::from_secs(config.timeout_secs));
    }
    let client = builder.build().context("failed to build HTTP client")?;

    Ok(Self {
      client,
      base_url: config.base_url.clone(),
      api_key: config.api_key.clone(),
    })
  }

  /// `{base_url}json?latlng={lat},{lng}&sensor=true&key={api_key}`
  pub fn request_url(&self, position: Position) -> String {
    format!(
      "{}json?latlng={},{}&sensor=true&key={}",
      self.base_url, position.latitude, position.longitude, self.api_key
    )
  }

  /// The first formatted address for `position`, or `None` if the service
  /// found nothing.
  pub async fn reverse(&self, position: Position) -> Result<Option<String>, FetchError> {
    let resp: GeocodeResponse = fetch_json(&self.client, &self.request_url(position)).await?;
    Ok(resp.results.into_iter().next().map(|r| r.formatted_address))
  }
}

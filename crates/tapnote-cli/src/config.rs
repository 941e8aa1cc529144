//! Runtime configuration, layered from an optional TOML file and
//! `TAPNOTE_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Directory holding the note database.
  pub data_dir:   PathBuf,
  pub log_file:   PathBuf,
  /// Schema version the store is opened at. Raising it wipes the notes.
  pub db_version: u32,
  pub geocode:    GeocodeConfig,
  /// Fixed device position; without it title suggestions are skipped.
  pub location:   Option<LocationConfig>,
  pub picker:     PickerConfig,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      data_dir:   PathBuf::from("~/.local/share/tapnote"),
      log_file:   PathBuf::from("~/.local/share/tapnote/tapnote.log"),
      db_version: 1,
      geocode:    GeocodeConfig::default(),
      location:   None,
      picker:     PickerConfig::default(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocodeConfig {
  pub base_url:     String,
  /// Empty disables reverse geocoding.
  pub api_key:      String,
  /// 0 means no timeout.
  pub timeout_secs: u64,
}

impl Default for GeocodeConfig {
  fn default() -> Self {
    Self {
      base_url:     "https://maps.googleapis.com/maps/api/geocode/".into(),
      api_key:      String::new(),
      timeout_secs: 0,
    }
  }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LocationConfig {
  pub latitude:  f64,
  pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
  /// Program and arguments; must print the chosen path on stdout.
  pub command: Vec<String>,
}

impl Default for PickerConfig {
  fn default() -> Self {
    Self {
      command: ["zenity", "--file-selection", "--file-filter=*.png *.jpg *.jpeg"]
        .into_iter()
        .map(str::to_owned)
        .collect(),
    }
  }
}

impl AppConfig {
  /// Read `path` (if it exists) and the environment over the defaults.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(
        config::Environment::with_prefix("TAPNOTE")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .context("failed to read config file")?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise AppConfig")?;

    cfg.data_dir = expand_tilde(&cfg.data_dir);
    cfg.log_file = expand_tilde(&cfg.log_file);
    Ok(cfg)
  }

  /// Options for the note store, rooted at `data_dir`.
  pub fn db_options(&self) -> anyhow::Result<Value> {
    let data_dir = serde_json::to_value(&self.data_dir)
      .with_context(|| format!("encoding data dir {}", self.data_dir.display()))?;
    Ok(Value::Object(Map::from_iter([("dataDir".to_owned(), data_dir)])))
  }
}

/// Default config location, `~/.config/tapnote/config.toml`.
pub fn default_config_path() -> PathBuf { expand_tilde(Path::new("~/.config/tapnote/config.toml")) }

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

//! Image picker boundary.
//!
//! A [`Picker`] answers a [`PickRequest`] with an image blob. The user backing
//! out is reported as [`PickError::Cancelled`], distinct from real failures,
//! so callers can ignore it silently.

use std::{future::Future, path::Path, process::Stdio};

use tapnote_core::note::Blob;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum PickError {
  #[error("picker cancelled")]
  Cancelled,

  #[error("there was an error retrieving the image: {0}")]
  Failed(String),
}

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRequest {
  pub action:         String,
  pub accepted_types: Vec<String>,
}

impl PickRequest {
  /// Pick a PNG or JPEG image.
  pub fn images() -> Self {
    Self {
      action:         "pick".into(),
      accepted_types: ["image/png", "image/jpg", "image/jpeg"]
        .into_iter()
        .map(str::to_owned)
        .collect(),
    }
  }

  pub fn accepts(&self, mime_type: &str) -> bool {
    self.accepted_types.iter().any(|t| t == mime_type)
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

pub trait Picker: Send + Sync {
  /// Resolve exactly once with the picked blob or an error.
  fn pick<'a>(
    &'a self,
    request: &'a PickRequest,
  ) -> impl Future<Output = Result<Blob, PickError>> + Send + 'a;
}

// ─── Command picker ──────────────────────────────────────────────────────────

/// Runs an external chooser (e.g. `zenity --file-selection`) that prints the
/// chosen path on stdout. Exit status 1 with no output means the user
/// cancelled.
#[derive(Debug, Clone)]
pub struct CommandPicker {
  program: String,
  args:    Vec<String>,
}

impl CommandPicker {
  pub fn new(command: &[String]) -> Result<Self, PickError> {
    let (program, args) = command
      .split_first()
      .ok_or_else(|| PickError::Failed("no picker command configured".into()))?;
    Ok(Self { program: program.clone(), args: args.to_vec() })
  }
}

impl Picker for CommandPicker {
  async fn pick(&self, request: &PickRequest) -> Result<Blob, PickError> {
    tracing::debug!(program = %self.program, action = %request.action, "launching picker");

    let output = Command::new(&self.program)
      .args(&self.args)
      .stdin(Stdio::null())
      .stderr(Stdio::null())
      .output()
      .await
      .map_err(|e| PickError::Failed(format!("spawning {}: {e}", self.program)))?;

    let chosen = String::from_utf8_lossy(&output.stdout).trim().to_owned();

    if !output.status.success() {
      if output.status.code() == Some(1) && chosen.is_empty() {
        return Err(PickError::Cancelled);
      }
      return Err(PickError::Failed(format!("picker exited with {}", output.status)));
    }
    if chosen.is_empty() {
      return Err(PickError::Failed("picker returned no file".into()));
    }

    let path = Path::new(&chosen);
    let mime_type = mime_for_path(path)
      .filter(|m| request.accepts(m))
      .ok_or_else(|| PickError::Failed(format!("{chosen} is not a supported image")))?;

    let data = tokio::fs::read(path)
      .await
      .map_err(|e| PickError::Failed(format!("reading {chosen}: {e}")))?;

    Ok(Blob::new(mime_type, data))
  }
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
  let ext = path.extension()?.to_str()?.to_ascii_lowercase();
  match ext.as_str() {
    "png" => Some("image/png"),
    "jpg" | "jpeg" => Some("image/jpeg"),
    _ => None,
  }
}

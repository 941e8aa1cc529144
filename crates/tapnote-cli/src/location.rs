//! Device location boundary.

use std::future::Future;

use thiserror::Error;

use crate::config::LocationConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
  pub latitude:  f64,
  pub longitude: f64,
}

#[derive(Debug, Error)]
pub enum LocateError {
  #[error("geolocation is not supported on this device")]
  Unsupported,
}

pub trait Locator: Send + Sync {
  fn locate(&self) -> impl Future<Output = Result<Position, LocateError>> + Send + '_;
}

/// Reports the position from the `[location]` config table, if there is one.
#[derive(Debug, Clone, Default)]
pub struct FixedLocator {
  position: Option<Position>,
}

impl FixedLocator {
  pub fn new(config: Option<&LocationConfig>) -> Self {
    Self {
      position: config.map(|c| Position { latitude: c.latitude, longitude: c.longitude }),
    }
  }
}

impl Locator for FixedLocator {
  async fn locate(&self) -> Result<Position, LocateError> {
    self.position.ok_or(LocateError::Unsupported)
  }
}

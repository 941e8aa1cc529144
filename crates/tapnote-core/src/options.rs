//! Options merging: a caller-supplied JSON object laid over typed defaults.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::Result;

/// Merge `options` over `defaults` and deserialise the result.
///
/// The merge is shallow: a key present in `options` replaces the default
/// value wholesale, every other key keeps its default. A non-object
/// `options` (including `null`) contributes nothing.
pub fn fallback_options<T>(options: Value, defaults: &T) -> Result<T>
where
  T: Serialize + DeserializeOwned,
{
  let mut merged = match serde_json::to_value(defaults)? {
    Value::Object(map) => map,
    _ => Map::new(),
  };

  if let Value::Object(overrides) = options {
    merged.extend(overrides);
  }

  Ok(serde_json::from_value(Value::Object(merged))?)
}

#[cfg(test)]
mod tests {
  use serde::Deserialize;
  use serde_json::json;

  use super::*;

  #[derive(Debug, PartialEq, Serialize, Deserialize)]
  struct Opts {
    name:  String,
    store: String,
    depth: u32,
  }

  fn defaults() -> Opts {
    Opts { name: "notes".into(), store: "note".into(), depth: 1 }
  }

  #[test]
  fn caller_keys_win() {
    let merged = fallback_options(json!({ "name": "other", "depth": 3 }), &defaults()).unwrap();
    assert_eq!(merged, Opts { name: "other".into(), store: "note".into(), depth: 3 });
  }

  #[test]
  fn null_keeps_defaults() {
    assert_eq!(fallback_options(Value::Null, &defaults()).unwrap(), defaults());
  }

  #[test]
  fn wrong_type_is_an_error() {
    assert!(fallback_options(json!({ "depth": "deep" }), &defaults()).is_err());
  }
}

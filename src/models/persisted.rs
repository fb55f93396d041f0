//! Versioned JSON envelope for list-shaped records kept in the key-value store.
//!
//! Lists are written as `{"version": 1, "items": [...]}`. Bare arrays written
//! by older builds are still read. Items are decoded one at a time so a single
//! malformed record is dropped instead of discarding the whole list.

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a, T> {
    version: u32,
    items: &'a [T],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Stored {
    Versioned { version: u32, items: Vec<Value> },
    Legacy(Vec<Value>),
}

pub fn encode_list<T: Serialize>(items: &[T]) -> Result<String> {
    let envelope = Envelope {
        version: SCHEMA_VERSION,
        items,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decode a stored list. Fails only when the outer shape is unreadable or the
/// version is newer than this build understands.
pub fn decode_list<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>> {
    let stored: Stored = serde_json::from_str(raw)?;
    let values = match stored {
        Stored::Versioned { version, items } if version <= SCHEMA_VERSION => items,
        Stored::Versioned { version, .. } => {
            return Err(anyhow!("unsupported schema version {}", version));
        }
        Stored::Legacy(items) => items,
    };

    let mut result = Vec::with_capacity(values.len());
    for (idx, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<T>(value) {
            Ok(item) => result.push(item),
            Err(e) => log::warn!("Dropping malformed record #{}: {}", idx, e),
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Counter;

    #[test]
    fn encode_wraps_items_with_version() {
        let raw = encode_list(&[Counter::new("Fajr")]).unwrap();
        let v: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v["version"], SCHEMA_VERSION);
        assert_eq!(v["items"][0]["name"], "Fajr");
    }

    #[test]
    fn decode_reads_legacy_bare_array() {
        let raw = r#"[{"name":"Fajr","missed":3,"completed":1},{"name":"Asr","missed":0,"completed":0}]"#;
        let counters: Vec<Counter> = decode_list(raw).unwrap();
        assert_eq!(counters.len(), 2);
        assert_eq!(counters[0].missed, 3);
    }

    #[test]
    fn decode_drops_only_the_bad_item() {
        let raw = r#"{"version":1,"items":[{"name":"Fajr","missed":-2},{"name":"Asr","missed":4}]}"#;
        let counters: Vec<Counter> = decode_list(raw).unwrap();
        assert_eq!(counters, vec![Counter { id: "Asr".into(), missed: 4, completed: 0 }]);
    }

    #[test]
    fn decode_rejects_future_versions() {
        let raw = r#"{"version":99,"items":[]}"#;
        assert!(decode_list::<Counter>(raw).is_err());
    }

    #[test]
    fn decode_rejects_non_list() {
        assert!(decode_list::<Counter>("{not json").is_err());
        assert!(decode_list::<Counter>(r#"{"hello":"world"}"#).is_err());
    }
}

//! Canonical cache-key construction.
//!
//! Cache hits depend on logically-equal lookup parameters producing byte-identical keys. Keys are
//! built by serializing parameters to canonical JSON (object keys sorted at every depth) and
//! hashing the result with BLAKE3, prefixed by a namespace.

use blake3::Hasher;
use serde::Serialize;
use serde_json::{Map, Value};

/// Serializes `value` to JSON with object keys sorted recursively.
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let value = canonicalize(serde_json::to_value(value)?);
    serde_json::to_string(&value)
}

/// Builds a `"{namespace}:{hex}"` key for arbitrary serializable lookup parameters.
pub fn cache_key<T: Serialize + ?Sized>(
    namespace: &str,
    params: &T,
) -> Result<String, serde_json::Error> {
    let json = canonical_json(params)?;
    Ok(namespaced_key(namespace, json.as_bytes()))
}

/// Builds a key for a single piece of text (infallible shortcut for [`cache_key`]).
pub fn text_key(namespace: &str, text: &str) -> String {
    namespaced_key(namespace, text.as_bytes())
}

fn namespaced_key(namespace: &str, payload: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(namespace.as_bytes());
    hasher.update(b"|");
    hasher.update(payload);
    format!("{}:{}", namespace, hasher.finalize().to_hex())
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, value) in entries {
                sorted.insert(key, canonicalize(value));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

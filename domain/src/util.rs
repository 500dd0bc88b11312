//! Shared utility functions.

use serde_json::{Map, Value};

/// Metadata/argument key fragments whose values must never reach the audit
/// log or the event bus in clear text.
const SENSITIVE_KEYS: &[&str] = &[
    "password",
    "pass",
    "secret",
    "token",
    "key",
    "credentials",
    "api_key",
    "apikey",
];

/// Truncate a string to approximately `max_bytes` without splitting a UTF-8
/// character boundary.
///
/// Returns a sub-slice of the original string. If the string is shorter than
/// `max_bytes`, the entire string is returned unchanged.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Redact sensitive values from a JSON object before it is attached to an
/// audit entry or execution event.
///
/// Any key containing one of the sensitive fragments (case-insensitive) has
/// its value replaced by `"[REDACTED]"`. Nested objects are sanitized
/// recursively; arrays are sanitized element-wise.
pub fn sanitize_map(map: &Map<String, Value>) -> Map<String, Value> {
    let mut sanitized = Map::new();
    for (name, value) in map {
        if is_sensitive_key(name) {
            sanitized.insert(name.clone(), Value::String("[REDACTED]".to_string()));
        } else {
            sanitized.insert(name.clone(), sanitize_value(value));
        }
    }
    sanitized
}

fn sanitize_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(sanitize_map(map)),
        Value::Array(items) => Value::Array(items.iter().map(sanitize_value).collect()),
        other => other.clone(),
    }
}

fn is_sensitive_key(name: &str) -> bool {
    let lower = name.to_lowercase();
    SENSITIVE_KEYS.iter().any(|k| lower.contains(k))
}

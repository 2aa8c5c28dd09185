//! Bounded value summarization for safe logging.
//!
//! A lossy projection of an arbitrary value into something that can go
//! to the log stream: strings are truncated, collections capped, nesting
//! depth bounded, binary payloads reduced to their length. The input is
//! never returned by reference and never mutated.

use serde_json::{Map, Value};

/// Nesting levels summarized before cutting off.
pub const MAX_DEPTH: usize = 5;
/// Longest string carried through unchanged, in characters.
pub const MAX_STRING_CHARS: usize = 2000;
/// Most elements or entries summarized per collection.
pub const MAX_ENTRIES: usize = 20;

const DEPTH_MARKER: &str = "[max depth]";
/// Reserved key carrying the count of entries omitted from an object.
pub const OMITTED_KEY: &str = "_omitted";

/// Produce a bounded summary of `value`.
///
/// Deterministic and side-effect free: summarizing the same value twice
/// yields equal results.
pub fn summarize(value: &Value) -> Value {
    summarize_at(value, 0)
}

/// Describe a binary payload by length only; contents are never logged.
pub fn summarize_bytes(bytes: &[u8]) -> Value {
    Value::String(format!("[{} bytes]", bytes.len()))
}

fn summarize_at(value: &Value, depth: usize) -> Value {
    if depth > MAX_DEPTH {
        return Value::String(DEPTH_MARKER.to_string());
    }
    match value {
        Value::String(s) => match s.char_indices().nth(MAX_STRING_CHARS) {
            Some((cut, _)) => {
                let mut truncated = s[..cut].to_string();
                truncated.push('…');
                Value::String(truncated)
            }
            None => value.clone(),
        },
        Value::Array(items) => {
            let mut out: Vec<Value> = items
                .iter()
                .take(MAX_ENTRIES)
                .map(|item| summarize_at(item, depth + 1))
                .collect();
            if items.len() > MAX_ENTRIES {
                out.push(Value::String(format!("[{} items total]", items.len())));
            }
            Value::Array(out)
        }
        Value::Object(entries) => {
            let mut out = Map::new();
            for (key, entry) in entries.iter().take(MAX_ENTRIES) {
                out.insert(key.clone(), summarize_at(entry, depth + 1));
            }
            if entries.len() > MAX_ENTRIES {
                out.insert(
                    OMITTED_KEY.to_string(),
                    Value::from(entries.len() - MAX_ENTRIES),
                );
            }
            Value::Object(out)
        }
        // Null, numbers, and booleans pass through unchanged.
        other => other.clone(),
    }
}

//! Explicit environment context.
//!
//! Bootstrap phases never touch the process environment directly; they
//! read and write an [`EnvState`] threaded through the sequence. The
//! binary seeds it from the real environment and publishes the
//! normalized state back once the sequence is done.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// Default HTTP port when `PORT` is unset or unusable.
pub const DEFAULT_PORT: &str = "10000";

/// Mutable string-to-string environment map.
#[derive(Debug, Clone, Default)]
pub struct EnvState {
    vars: BTreeMap<String, String>,
}

impl EnvState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Iterate variables in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// Coerce a port-bearing variable into a canonical port number string.
///
/// Accepts any finite integral value in `0..=65535` (leading zeros and
/// exponent forms are canonicalized away). A value starting with `$` is
/// an indirection through the named variable, resolved through the same
/// numeric gate. Anything else takes the fallback; with no fallback the
/// variable keeps its original value and a warning is emitted.
pub fn normalize_port(env: &mut EnvState, key: &str, fallback: Option<&str>) {
    let raw = match env.get(key) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => {
            if let Some(fallback) = fallback {
                env.set(key, fallback);
            }
            return;
        }
    };

    if let Some(port) = parse_port(&raw) {
        env.set(key, port.to_string());
        return;
    }

    if let Some(referenced) = raw.strip_prefix('$') {
        if let Some(port) = env.get(referenced).and_then(parse_port) {
            env.set(key, port.to_string());
            return;
        }
    }

    match fallback {
        Some(fallback) => env.set(key, fallback),
        None => warn!(var = key, value = %raw, "unusable port variable left as-is"),
    }
}

fn parse_port(raw: &str) -> Option<u16> {
    let numeric: f64 = raw.trim().parse().ok()?;
    if numeric.is_finite() && numeric.fract() == 0.0 && (0.0..=65535.0).contains(&numeric) {
        Some(numeric as u16)
    } else {
        None
    }
}

/// Adopt `KEY=VALUE` defaults from a file, without overwriting anything
/// already present in the state.
///
/// Blank lines and `#` comments are skipped. The key is trimmed; the
/// value is everything after the first `=`, kept raw. Returns the number
/// of adopted entries. A missing file is a no-op.
pub fn load_env_file(env: &mut EnvState, path: &Path) -> Result<usize> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(Error::Read {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let mut adopted = 0;
    for line in text.split(['\r', '\n']) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        if !env.contains(key) {
            env.set(key, value);
            adopted += 1;
        }
    }
    Ok(adopted)
}

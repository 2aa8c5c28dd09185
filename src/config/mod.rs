//! Configuration loading and assembly.
//!
//! The merge base is a TOML document, the site list a JSON document with
//! an optional `sites` array. Both stay opaque `serde_json::Value`s; the
//! assembler only guarantees the `sites.list` shape and injects provider
//! secrets from the environment.

pub mod secrets;

use crate::env::EnvState;
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::warn;

/// Top-level site list document wrapper.
#[derive(Debug, Deserialize)]
struct SiteDocument {
    #[serde(default)]
    sites: Vec<Value>,
}

/// Load the base configuration file.
///
/// A missing file degrades to an empty config; a malformed one is fatal.
pub fn load_base_config(path: &Path) -> Result<Value> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "base config not found, starting empty");
            return Ok(Value::Object(Map::new()));
        }
        Err(e) => {
            return Err(Error::Read {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    toml::from_str(&text)
        .map_err(|e| Error::Config(format!("bad base config {}: {e}", path.display())))
}

/// Load the site list document. Never fatal: unreadable or malformed
/// documents degrade to an empty list with a warning.
pub fn load_sites(path: &Path) -> Vec<Value> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read site list");
            return Vec::new();
        }
    };
    match serde_json::from_str::<SiteDocument>(&text) {
        Ok(document) => document.sites,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed site list");
            Vec::new()
        }
    }
}

/// Merge the base configuration with the external site list and the
/// environment-sourced provider secrets.
///
/// `sites.list` is always an array afterwards; a non-empty external list
/// replaces it wholesale. Set, non-empty secret variables overwrite
/// their config fields.
pub fn assemble(base: &Value, env: &EnvState, sites: Vec<Value>) -> Value {
    let mut config = match base.as_object() {
        Some(table) => table.clone(),
        None => {
            if !base.is_null() {
                warn!("base config is not a table, ignoring it");
            }
            Map::new()
        }
    };

    if !config.get("sites").is_some_and(Value::is_object) {
        config.insert("sites".to_string(), Value::Object(Map::new()));
    }
    if let Some(Value::Object(sites_table)) = config.get_mut("sites") {
        if !sites_table.get("list").is_some_and(Value::is_array) {
            sites_table.insert("list".to_string(), Value::Array(Vec::new()));
        }
        if !sites.is_empty() {
            sites_table.insert("list".to_string(), Value::Array(sites));
        }
    }

    secrets::inject(&mut config, env);
    Value::Object(config)
}

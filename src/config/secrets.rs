//! Provider secret injection.
//!
//! Credentials for the download providers come in through the
//! environment and overwrite their config fields at assembly time.
//! Values ride in `secrecy::SecretString` until the moment of injection
//! so they never show up in debug output along the way.

use crate::env::EnvState;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};

/// Provider credential table: environment variable -> (section, field).
const PROVIDER_SECRETS: &[(&str, &str, &str)] = &[
    ("ALI_TOKEN", "ali", "token"),
    ("QUARK_COOKIE", "quark", "cookie"),
    ("UC_COOKIE", "uc", "cookie"),
    ("BAIDU_COOKIE", "baidu", "cookie"),
];

/// Overwrite provider credential fields from the environment.
///
/// Set, non-empty environment values always win over the base config;
/// the provider section is created when absent.
pub fn inject(config: &mut Map<String, Value>, env: &EnvState) {
    for &(var, section, field) in PROVIDER_SECRETS {
        let Some(secret) = read(env, var) else {
            continue;
        };
        if !config.get(section).is_some_and(Value::is_object) {
            config.insert(section.to_string(), Value::Object(Map::new()));
        }
        if let Some(Value::Object(table)) = config.get_mut(section) {
            table.insert(
                field.to_string(),
                Value::String(secret.expose_secret().to_string()),
            );
        }
    }
}

fn read(env: &EnvState, var: &str) -> Option<SecretString> {
    env.get(var)
        .filter(|value| !value.is_empty())
        .map(|value| SecretString::from(value.to_string()))
}

//! Configuration loading and assembly.

use catpaw::config;
use catpaw::env::EnvState;
use serde_json::{Value, json};

#[test]
fn external_site_list_replaces_base_list_in_order() {
    let sites = vec![json!({"name": "a"}), json!({"name": "b"}), json!({"name": "c"})];
    let config = config::assemble(&json!({}), &EnvState::new(), sites.clone());
    assert_eq!(config["sites"]["list"], Value::Array(sites));
}

#[test]
fn empty_external_list_keeps_base_list() {
    let base = json!({"sites": {"list": [1, 2]}});
    let config = config::assemble(&base, &EnvState::new(), Vec::new());
    assert_eq!(config["sites"]["list"], json!([1, 2]));
}

#[test]
fn non_array_base_list_is_reset() {
    let base = json!({"sites": {"list": "bogus"}});
    let config = config::assemble(&base, &EnvState::new(), Vec::new());
    assert_eq!(config["sites"]["list"], json!([]));
}

#[test]
fn non_object_base_degrades_to_empty() {
    let config = config::assemble(&json!(42), &EnvState::new(), Vec::new());
    assert_eq!(config["sites"]["list"], json!([]));
}

#[test]
fn env_secrets_overwrite_base_values() {
    let base = json!({"ali": {"token": "old"}});
    let mut env = EnvState::new();
    env.set("ALI_TOKEN", "new");
    env.set("QUARK_COOKIE", "qk");
    let config = config::assemble(&base, &env, Vec::new());

    assert_eq!(config["ali"]["token"], json!("new"));
    // Section created when absent.
    assert_eq!(config["quark"]["cookie"], json!("qk"));
}

#[test]
fn empty_env_secret_is_ignored() {
    let base = json!({"uc": {"cookie": "kept"}});
    let mut env = EnvState::new();
    env.set("UC_COOKIE", "");
    let config = config::assemble(&base, &env, Vec::new());
    assert_eq!(config["uc"]["cookie"], json!("kept"));
}

#[test]
fn untouched_base_fields_survive_assembly() {
    let base = json!({"crawl": {"interval": 60}, "baidu": {"cookie": "base"}});
    let config = config::assemble(&base, &EnvState::new(), Vec::new());
    assert_eq!(config["crawl"]["interval"], json!(60));
    assert_eq!(config["baidu"]["cookie"], json!("base"));
}

#[test]
fn base_config_loads_toml_into_opaque_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catpaw.toml");
    std::fs::write(&path, "[ali]\ntoken = \"t\"\n\n[crawl]\ninterval = 60\n").unwrap();

    let base = config::load_base_config(&path).unwrap();
    assert_eq!(base["ali"]["token"], json!("t"));
    assert_eq!(base["crawl"]["interval"], json!(60));
}

#[test]
fn missing_base_config_degrades_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let base = config::load_base_config(&dir.path().join("nope.toml")).unwrap();
    assert_eq!(base, json!({}));
}

#[test]
fn malformed_base_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catpaw.toml");
    std::fs::write(&path, "not toml [[[").unwrap();
    assert!(config::load_base_config(&path).is_err());
}

#[test]
fn site_list_failures_degrade_to_empty() {
    let dir = tempfile::tempdir().unwrap();

    assert!(config::load_sites(&dir.path().join("nope.json")).is_empty());

    let malformed = dir.path().join("bad.json");
    std::fs::write(&malformed, "{not json").unwrap();
    assert!(config::load_sites(&malformed).is_empty());

    let no_sites = dir.path().join("empty.json");
    std::fs::write(&no_sites, "{}").unwrap();
    assert!(config::load_sites(&no_sites).is_empty());
}

#[test]
fn site_list_records_stay_opaque() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sites.json");
    std::fs::write(
        &path,
        r#"{"sites": [{"name": "x", "nested": {"deep": true}}, "plain-string"]}"#,
    )
    .unwrap();

    let sites = config::load_sites(&path);
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0]["nested"]["deep"], json!(true));
    assert_eq!(sites[1], json!("plain-string"));
}

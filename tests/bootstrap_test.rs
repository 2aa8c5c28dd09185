//! Full bootstrap sequence: defaults file -> ports -> config assembly
//! -> delegation.

use catpaw::bootstrap::Bootstrap;
use catpaw::env::EnvState;
use catpaw::error::Result;
use catpaw::server::Server;
use serde_json::{Value, json};
use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex};

fn fixture(dir: &Path) -> Bootstrap {
    Bootstrap {
        env_file: dir.join(".env.local"),
        config_file: dir.join("catpaw.toml"),
        sites_file: dir.join("sites.json"),
    }
}

#[test]
fn full_sequence_produces_the_merged_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".env.local"),
        "BAIDU_COOKIE=from-file\nUC_COOKIE=ignored\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("catpaw.toml"),
        "[ali]\ntoken = \"base-token\"\n\n[crawl]\ninterval = 60\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("sites.json"),
        r#"{"sites": [{"name": "a"}, {"name": "b"}]}"#,
    )
    .unwrap();

    let mut env = EnvState::new();
    env.set("PORT", "0800");
    env.set("UC_COOKIE", "from-env");

    let config = fixture(dir.path()).prepare(&mut env).unwrap();

    assert_eq!(env.get("PORT"), Some("800"));
    // Dev port defaults to the resolved primary port.
    assert_eq!(env.get("DEV_HTTP_PORT"), Some("800"));

    assert_eq!(config["sites"]["list"], json!([{"name": "a"}, {"name": "b"}]));
    // No ALI_TOKEN in the environment: base value survives.
    assert_eq!(config["ali"]["token"], json!("base-token"));
    assert_eq!(config["crawl"]["interval"], json!(60));
    // Environment beats the defaults file, file fills the gap.
    assert_eq!(config["uc"]["cookie"], json!("from-env"));
    assert_eq!(config["baidu"]["cookie"], json!("from-file"));
}

#[test]
fn missing_inputs_still_boot() {
    let dir = tempfile::tempdir().unwrap();
    let mut env = EnvState::new();

    let config = fixture(dir.path()).prepare(&mut env).unwrap();

    assert_eq!(env.get("PORT"), Some("10000"));
    assert_eq!(env.get("DEV_HTTP_PORT"), Some("10000"));
    assert_eq!(config["sites"]["list"], json!([]));
}

struct Recording(Arc<Mutex<Vec<Value>>>);

impl Server for Recording {
    fn start(self, config: Value) -> impl Future<Output = Result<()>> + Send {
        async move {
            self.0.lock().unwrap().push(config);
            Ok(())
        }
    }
}

#[tokio::test]
async fn run_hands_the_config_over_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("sites.json"), r#"{"sites": [1]}"#).unwrap();

    let boot = fixture(dir.path());
    let mut env = EnvState::new();
    let expected = boot.prepare(&mut EnvState::new()).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    boot.run(&mut env, Recording(Arc::clone(&seen))).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], expected);
}

//! Run-to-completion bootstrap sequence.
//!
//! All phases execute synchronously and in order: defaults file, port
//! normalization, base config, site list, assembly. Only the final
//! delegation to the server is asynchronous. The sequence mutates
//! nothing but the [`EnvState`] it is handed.

use crate::config;
use crate::env::{self, DEFAULT_PORT, EnvState};
use crate::error::Result;
use crate::server::Server;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

/// File locations for one bootstrap run.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    /// `KEY=VALUE` defaults, adopted only for variables the environment
    /// does not already set.
    pub env_file: PathBuf,
    /// Base configuration (TOML), the merge base.
    pub config_file: PathBuf,
    /// Site list document (JSON with a `sites` array).
    pub sites_file: PathBuf,
}

impl Bootstrap {
    /// Execute the sequential phases and return the assembled config.
    pub fn prepare(&self, env: &mut EnvState) -> Result<Value> {
        let adopted = env::load_env_file(env, &self.env_file)?;
        if adopted > 0 {
            info!(count = adopted, path = %self.env_file.display(), "adopted env defaults");
        }

        env::normalize_port(env, "PORT", Some(DEFAULT_PORT));
        let dev_fallback = env.get("PORT").unwrap_or(DEFAULT_PORT).to_string();
        env::normalize_port(env, "DEV_HTTP_PORT", Some(dev_fallback.as_str()));

        let base = config::load_base_config(&self.config_file)?;
        let sites = config::load_sites(&self.sites_file);
        info!(sites = sites.len(), "assembling configuration");

        Ok(config::assemble(&base, env, sites))
    }

    /// Prepare, then hand the configuration to the server exactly once.
    pub async fn run<S: Server>(&self, env: &mut EnvState, server: S) -> Result<()> {
        let config = self.prepare(env)?;
        server.start(config).await
    }
}

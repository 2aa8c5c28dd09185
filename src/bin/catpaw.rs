//! catpaw CLI: bootstrap and launch the crawl server.

use catpaw::bootstrap::Bootstrap;
use catpaw::env::EnvState;
use catpaw::error::Result;
use catpaw::server::Server;
use catpaw::telemetry::{self, fault, summary};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::future::Future;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "catpaw", about = "Bootstrap for the Catpaw crawl server")]
struct Cli {
    /// KEY=VALUE defaults file; the real environment always wins over it
    #[arg(long, global = true, default_value = ".env.local")]
    env_file: PathBuf,
    /// Base configuration file
    #[arg(long, global = true, default_value = "catpaw.toml")]
    config: PathBuf,
    /// Site list document
    #[arg(long, global = true, default_value = "sites.json")]
    sites: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the bootstrap and start the server
    Serve,
    /// Run the bootstrap and print the assembled configuration,
    /// bounded by the log summarizer
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init()?;

    let boot = Bootstrap {
        env_file: cli.env_file,
        config_file: cli.config,
        sites_file: cli.sites,
    };
    let mut env = EnvState::from_process();

    match cli.command {
        Command::Check => {
            let config = boot.prepare(&mut env)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&summary::summarize(&config))?
            );
        }
        Command::Serve => {
            let config = boot.prepare(&mut env)?;
            publish_env(&env);
            fault::install_panic_hook();
            CrawlServer.start(config).await?;
        }
    }
    Ok(())
}

/// Publish the normalized environment back to the process for the
/// crawl engine: adopted defaults and canonicalized port variables.
fn publish_env(env: &EnvState) {
    for (key, value) in env.iter() {
        if std::env::var(key).as_deref() != Ok(value) {
            // Nothing else reads the environment until the server runs.
            unsafe { std::env::set_var(key, value) };
        }
    }
}

/// Stand-in engine: the crawl server proper plugs in through the
/// [`Server`] trait. This one logs the summarized configuration and
/// parks until shutdown.
struct CrawlServer;

impl Server for CrawlServer {
    fn start(self, config: Value) -> impl Future<Output = Result<()>> + Send {
        async move {
            let port = std::env::var("PORT").unwrap_or_default();
            info!(%port, config = %summary::summarize(&config), "crawl server started");
            tokio::signal::ctrl_c().await.ok();
            info!("shutting down");
            Ok(())
        }
    }
}

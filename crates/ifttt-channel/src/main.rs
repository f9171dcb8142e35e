//! ifttt-channel — the Wikipedia channel daemon.
//!
//! Loads configuration, assembles the trigger registry, and serves the
//! IFTTT endpoints.
//!
//! # Usage
//!
//! ```text
//! ifttt-channel serve --default-config default.toml --config ifttt.toml
//! ifttt-channel routes --format json
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ifttt_core::{ChannelConfig, TriggerRegistry};
use ifttt_triggers::{FeedFetcher, HttpFetcher};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "ifttt-channel", about = "Wikipedia channel for IFTTT", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the channel endpoints.
    Serve {
        /// Configuration defaults, loaded first.
        #[arg(long, default_value = "default.toml")]
        default_config: PathBuf,

        /// Site-specific overrides, loaded on top of the defaults.
        #[arg(long, default_value = "ifttt.toml")]
        config: PathBuf,

        /// Listen address; overrides BIND from the config files.
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Print the trigger route table.
    Routes {
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new("info,ifttt=debug"))?,
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            default_config,
            config,
            bind,
        } => serve(default_config, config, bind).await,
        Command::Routes { format } => print_routes(&format),
    }
}

/// Assemble the registry; slug collisions abort startup.
fn build_registry(fetcher: Arc<dyn FeedFetcher>) -> anyhow::Result<TriggerRegistry> {
    TriggerRegistry::new(ifttt_triggers::catalog(fetcher)).context("invalid trigger registry")
}

async fn serve(
    default_config: PathBuf,
    override_config: PathBuf,
    bind: Option<SocketAddr>,
) -> anyhow::Result<()> {
    let config = ChannelConfig::load(&default_config, &override_config)?;
    info!(?config, "configuration loaded");
    if config.debug {
        warn!("DEBUG is enabled: channel key checks are disabled");
    }

    let fetcher = HttpFetcher::new(
        config.user_agent.as_deref(),
        Duration::from_secs(config.fetch_timeout_secs),
    )?;
    let registry = build_registry(Arc::new(fetcher))?;
    for trigger in registry.iter() {
        info!(trigger = trigger.name(), slug = %trigger.slug(), "trigger registered");
    }
    info!(count = registry.len(), "trigger registry built");

    let addr = match bind {
        Some(addr) => addr,
        None => config
            .bind
            .parse()
            .with_context(|| format!("invalid BIND address '{}'", config.bind))?,
    };

    let router = ifttt_api::build_router(ifttt_api::ChannelState::new(registry, &config));

    info!(%addr, "channel server starting");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("channel server stopped");
    Ok(())
}

fn print_routes(format: &str) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new(None, Duration::from_secs(1))?;
    let registry = build_registry(Arc::new(fetcher))?;

    let routes: Vec<(String, String)> = registry
        .iter()
        .map(|t| (t.name().to_string(), format!("/ifttt/v1/triggers/{}", t.slug())))
        .collect();

    match format {
        "json" => {
            let table: serde_json::Map<String, serde_json::Value> = routes
                .into_iter()
                .map(|(name, path)| (name, serde_json::Value::String(path)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
        "text" => {
            for (name, path) in routes {
                println!("{name:<26} {path}");
            }
        }
        other => anyhow::bail!("unknown format '{other}' (expected text or json)"),
    }
    Ok(())
}

//! Sahacara API Server
//!
//! Run with: cargo run --bin sahacara
//!
//! # Configuration
//!
//! Loaded from `--config PATH`, else the first of
//! `~/.config/sahacara/config.toml`, `/etc/sahacara/config.toml`,
//! `./config.toml`, then overridden by environment variables:
//! - `SAHACARA_HOST`, `SAHACARA_PORT`: bind address (default: 0.0.0.0:5000)
//! - `SAHACARA_API_KEY`: upstream bearer credential (required to serve chat)
//! - `SAHACARA_UPSTREAM_URL`, `SAHACARA_MODEL`: upstream endpoint and model
//! - `SAHACARA_LOG_LEVEL`, `SAHACARA_LOG_FORMAT`: logging
//! - `RUST_LOG`: full tracing filter (overrides the log level)
//!
//! A `.env` file in the working directory is loaded first.

use anyhow::Context;
use clap::Parser;
use sahacara::api::{serve, AppState};
use sahacara::config::{Config, LoggingConfig};
use std::path::PathBuf;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

#[derive(Parser)]
#[command(name = "sahacara")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Health chat relay server")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    // The configured subscriber depends on the config, so loading is
    // logged through a temporary stderr one.
    let bootstrap = bootstrap_subscriber(bootstrap_filter(), std::io::stderr);
    let mut config = tracing::subscriber::with_default(bootstrap, || load_config(&args))?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    init_tracing(&config.logging);

    tracing::info!("Starting Sahacara API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        endpoint = %config.upstream.endpoint,
        model = %config.upstream.model,
        timeout_secs = config.upstream.timeout_secs,
        "Upstream configured"
    );
    tracing::info!(
        calorie_goal = config.analysis.calorie_goal,
        water_goal = config.analysis.water_goal,
        water_threshold = config.analysis.water_threshold,
        "Analysis defaults"
    );

    if !config.upstream.has_api_key() {
        tracing::warn!(
            "No upstream API key configured (set SAHACARA_API_KEY); chat requests will fail until one is provided"
        );
    }

    let server = config.server.clone();
    let state = AppState::from_config(config).context("Failed to build upstream client")?;

    serve(state, &server).await?;

    tracing::info!("Sahacara API server stopped");
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    match &args.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => Ok(Config::load_default()),
    }
}

fn bootstrap_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sahacara=info"))
}

/// Plain subscriber used while the config is still being loaded
fn bootstrap_subscriber<W>(filter: EnvFilter, writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .finish()
}

/// Initialize tracing from the logging config; `RUST_LOG` wins when set
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "sahacara={level},tower_http={level}",
            level = logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format.eq_ignore_ascii_case("json") {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

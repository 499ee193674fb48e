//! Sahacara CLI
//!
//! Command-line interface for Sahacara operations:
//! - Preview the health analysis or rendered prompt offline
//! - Send a chat message to a running server
//! - Check server status
//! - Generate a default config file

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use sahacara::analysis::{Evaluator, HealthMetrics};
use sahacara::config::{generate_default_config, Config};
use sahacara::relay::render_prompt;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sahacara-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Health chat relay tooling")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:5000", global = true)]
    pub api_url: String,

    /// Config file used for analysis defaults (offline commands)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the health analysis for the given metrics as JSON
    Analyze {
        #[command(flatten)]
        metrics: MetricArgs,
    },

    /// Print the prompt that would be sent upstream
    Prompt {
        /// User message
        #[arg(short, long, default_value = "")]
        message: String,
        #[command(flatten)]
        metrics: MetricArgs,
    },

    /// Send a chat message to a running server
    Chat {
        /// User message
        message: String,
        #[command(flatten)]
        metrics: MetricArgs,
        /// Also print the analysis returned by the server
        #[arg(long)]
        show_analysis: bool,
    },

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Health metric flags; omitted flags fall back to the analysis defaults
#[derive(Args, Debug, Clone, Default)]
pub struct MetricArgs {
    /// Calories consumed
    #[arg(long)]
    pub calories: Option<f64>,
    /// Calorie goal
    #[arg(long)]
    pub calorie_goal: Option<f64>,
    /// Mood rating (0-5)
    #[arg(long)]
    pub mood: Option<f64>,
    /// Servings of water consumed
    #[arg(long)]
    pub water: Option<f64>,
    /// Water goal
    #[arg(long)]
    pub water_goal: Option<f64>,
}

impl From<MetricArgs> for HealthMetrics {
    fn from(args: MetricArgs) -> Self {
        HealthMetrics {
            calories: args.calories,
            calorie_goal: args.calorie_goal,
            mood_rating: args.mood,
            water_intake: args.water,
            water_goal: args.water_goal,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // stdout carries command output; diagnostics such as a skipped config
    // file go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sahacara=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze { metrics } => {
            let evaluator = load_evaluator(cli.config.as_ref())?;
            let analysis = evaluator.evaluate(&metrics.into());
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }

        Commands::Prompt { message, metrics } => {
            let evaluator = load_evaluator(cli.config.as_ref())?;
            let analysis = evaluator.evaluate(&metrics.into());
            print!("{}", render_prompt(&message, &analysis));
        }

        Commands::Chat {
            message,
            metrics,
            show_analysis,
        } => {
            let health_context: HealthMetrics = metrics.into();
            let body = serde_json::json!({
                "message": message,
                "healthContext": health_context,
            });

            let response = reqwest::Client::new()
                .post(format!("{}/api/chat", cli.api_url))
                .json(&body)
                .send()
                .await
                .with_context(|| format!("Failed to reach {}", cli.api_url))?;

            let status = response.status();
            let data: serde_json::Value = response.json().await?;

            if !status.is_success() {
                bail!(
                    "Chat failed ({}): {}",
                    status,
                    data["error"].as_str().unwrap_or("unknown error")
                );
            }

            println!("{}", data["message"].as_str().unwrap_or_default());

            if show_analysis {
                println!();
                println!("{}", serde_json::to_string_pretty(&data["analysis"])?);
            }
        }

        Commands::Status => {
            let response = reqwest::Client::new()
                .get(format!("{}/health", cli.api_url))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    println!("Sahacara v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!(
                        "Upstream configured: {}",
                        health["upstream_configured"].as_bool().unwrap_or(false)
                    );
                    println!("Model: {}", health["model"].as_str().unwrap_or("unknown"));

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => bail!("Server returned {}", resp.status()),
                Err(e) => bail!("Cannot connect to {}: {}", cli.api_url, e),
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn load_evaluator(path: Option<&PathBuf>) -> anyhow::Result<Evaluator> {
    let config = match path {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => Config::load_default(),
    };
    Ok(Evaluator::new(config.analysis))
}

fn format_duration(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m {}s", minutes, secs % 60)
    }
}

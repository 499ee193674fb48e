//! # Sahacara
//!
//! Health chat relay: accepts a chat message plus a small bundle of health
//! metrics, derives a rule-based health analysis, embeds it into a prompt
//! for a generative-AI text API, and returns the reply with the analysis.
//!
//! ## Modules
//!
//! - [`analysis`]: Rule-based health-analysis evaluator
//! - [`relay`]: Prompt rendering and the upstream text-generation client
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use sahacara::analysis::{Evaluator, HealthMetrics};
//! use sahacara::config::AnalysisConfig;
//! use sahacara::relay::render_prompt;
//!
//! let evaluator = Evaluator::new(AnalysisConfig::default());
//! let analysis = evaluator.evaluate(
//!     &HealthMetrics::new().calories(2500.0).mood_rating(2.0).water_intake(3.0),
//! );
//!
//! assert_eq!(analysis.recommendations.len(), 2);
//!
//! let prompt = render_prompt("How am I doing today?", &analysis);
//! assert!(prompt.contains("How am I doing today?"));
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod relay;

// Re-export top-level types for convenience
pub use analysis::{
    CalorieStatus, Evaluator, HealthAnalysis, HealthMetrics, MetricStatus, MoodStatus, Priority,
    Recommendation, RecommendationCategory, WaterStatus,
};

pub use relay::{render_prompt, Relay, RelayError, RelayResult, TextGenerator, UpstreamClient};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{
    AnalysisConfig, Config, ConfigError, LoggingConfig, ServerConfig, UpstreamConfig,
};

//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.
//! The resulting [`Config`] is built once at startup and handed to the
//! components that need it; nothing reads the environment per request.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_body_bytes() -> usize {
    1024 * 1024 // 1 MiB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upstream text-generation API configuration
///
/// Generation parameters are forwarded verbatim; they are not validated here.
#[derive(Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bearer credential. Empty strings count as unset.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://localhost:8081/v1/generate".to_string()
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    1024
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl UpstreamConfig {
    /// The configured credential, if it is present and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Whether a usable credential is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Health analysis constants
///
/// `water_goal` is what the user sees; `water_threshold` is the decision
/// boundary. They are independent values.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default = "default_calorie_goal")]
    pub calorie_goal: f64,

    #[serde(default = "default_water_goal")]
    pub water_goal: f64,

    #[serde(default = "default_water_threshold")]
    pub water_threshold: f64,
}

fn default_calorie_goal() -> f64 {
    2000.0
}

fn default_water_goal() -> f64 {
    8.0
}

fn default_water_threshold() -> f64 {
    8.0
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            calorie_goal: default_calorie_goal(),
            water_goal: default_water_goal(),
            water_threshold: default_water_threshold(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("sahacara").join("config.toml")),
            Some(PathBuf::from("/etc/sahacara/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first existing, parseable file in `paths`, else env-only
    ///
    /// Unreadable or invalid files are logged and skipped.
    pub fn load_first(paths: &[PathBuf]) -> Self {
        for path_opt in paths {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(host) = lookup("SAHACARA_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SAHACARA_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!("Ignoring invalid SAHACARA_PORT: {}", port),
            }
        }

        // Upstream overrides
        if let Some(key) = lookup("SAHACARA_API_KEY") {
            self.upstream.api_key = Some(key);
        }
        if let Some(url) = lookup("SAHACARA_UPSTREAM_URL") {
            self.upstream.endpoint = url;
        }
        if let Some(model) = lookup("SAHACARA_MODEL") {
            self.upstream.model = model;
        }
        if let Some(secs) = lookup("SAHACARA_UPSTREAM_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(s) => self.upstream.timeout_secs = s,
                Err(_) => tracing::warn!("Ignoring invalid SAHACARA_UPSTREAM_TIMEOUT_SECS: {}", secs),
            }
        }

        // Logging overrides
        if let Some(level) = lookup("SAHACARA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("SAHACARA_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Sahacara Configuration
#
# Environment variables override these settings:
# - SAHACARA_HOST
# - SAHACARA_PORT
# - SAHACARA_API_KEY
# - SAHACARA_UPSTREAM_URL
# - SAHACARA_MODEL
# - SAHACARA_UPSTREAM_TIMEOUT_SECS
# - SAHACARA_LOG_LEVEL
# - SAHACARA_LOG_FORMAT
#
# A .env file in the working directory is loaded before these are read.

[server]
# Host to bind to
host = "0.0.0.0"

# Port to listen on
port = 5000

# Maximum request body size (bytes)
max_body_bytes = 1048576

[upstream]
# Text generation endpoint (receives a JSON POST with a bearer token)
endpoint = "http://localhost:8081/v1/generate"

# Bearer credential. Prefer SAHACARA_API_KEY over storing it here.
# api_key = ""

# Generation parameters, forwarded as-is
model = "gemini-pro"
temperature = 0.7
max_output_tokens = 1024

# Upstream request timeout in seconds
timeout_secs = 30

[analysis]
# Calorie goal used when the request does not provide one
calorie_goal = 2000

# Water goal shown to the user when the request does not provide one
water_goal = 8

# Water intake below this many servings needs attention
water_threshold = 8

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.
//! Everything here is read-only after startup.

use std::sync::Arc;
use std::time::Instant;

use crate::analysis::Evaluator;
use crate::config::Config;
use crate::relay::{Relay, RelayResult, UpstreamClient};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Health-analysis evaluator
    pub evaluator: Evaluator,
    /// Prompt relay to the upstream API
    pub relay: Relay,
    /// Configuration loaded at startup
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create state with an explicit relay
    pub fn new(config: Config, relay: Relay) -> Self {
        Self {
            evaluator: Evaluator::new(config.analysis.clone()),
            relay,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Create state with the HTTP upstream client built from `config`
    pub fn from_config(config: Config) -> RelayResult<Self> {
        let client = UpstreamClient::new(config.upstream.clone())?;
        Ok(Self::new(config, Relay::new(Arc::new(client))))
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

//! Prompt Relay
//!
//! Renders a health analysis and the user's message into a prompt and
//! forwards it to the upstream text-generation API.
//!
//! ## Architecture
//!
//! - **prompt**: Prompt template and status formatting
//! - **client**: `TextGenerator` trait and the HTTP `UpstreamClient`
//! - **error**: `RelayError`
//!
//! ## Data Flow
//!
//! 1. `render_prompt` embeds the analysis and the verbatim message
//! 2. The generator POSTs the prompt upstream (single attempt)
//! 3. The reply text, or a typed failure, is handed back to the caller

mod client;
mod error;
mod prompt;

pub use client::{TextGenerator, UpstreamClient};
pub use error::{RelayError, RelayResult};
pub use prompt::{humanize_status, render_prompt};

use crate::analysis::HealthAnalysis;
use std::sync::Arc;

/// Composes prompt rendering with a [`TextGenerator`]
#[derive(Clone)]
pub struct Relay {
    generator: Arc<dyn TextGenerator>,
}

impl Relay {
    /// Create a relay over the given generator
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Name of the underlying generator
    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Whether the upstream credential is configured
    pub fn is_configured(&self) -> bool {
        self.generator.is_configured()
    }

    /// Render the prompt for `message` and return the upstream reply
    pub async fn respond(&self, message: &str, analysis: &HealthAnalysis) -> RelayResult<String> {
        let prompt = render_prompt(message, analysis);

        tracing::debug!(
            generator = %self.generator.name(),
            recommendations = analysis.recommendations.len(),
            "Relaying prompt"
        );

        self.generator.generate(&prompt, message).await
    }
}

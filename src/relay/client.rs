//! Upstream text-generation client
//!
//! HTTP client for the generative-AI text API. One POST per call,
//! bearer-authenticated, bounded by the configured timeout. No retries.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::config::UpstreamConfig;
use crate::relay::error::{RelayError, RelayResult};

/// Anything that can turn a rendered prompt into reply text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable name for logs and health output
    fn name(&self) -> &str;

    /// Whether the generator has the credentials it needs
    fn is_configured(&self) -> bool;

    /// Generate a reply for the rendered prompt
    ///
    /// `question` is the user's raw message, sent alongside the prompt.
    async fn generate(&self, prompt: &str, question: &str) -> RelayResult<String>;
}

/// Bearer-authenticated client for the upstream API
pub struct UpstreamClient {
    client: Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    /// Create a new client with the configured timeout
    pub fn new(config: UpstreamConfig) -> RelayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(RelayError::ClientBuild)?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    fn build_request<'a>(&'a self, prompt: &'a str, question: &'a str) -> GenerationRequest<'a> {
        GenerationRequest {
            model: &self.config.model,
            prompt,
            question,
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_output_tokens,
        }
    }

    fn map_transport_error(&self, e: reqwest::Error) -> RelayError {
        if e.is_timeout() {
            RelayError::Timeout(self.config.timeout_secs)
        } else {
            RelayError::Request(e)
        }
    }

    /// Map a non-success status, preferring the upstream's own error message
    fn map_api_error(status: u16, response_text: &str) -> RelayError {
        let message = serde_json::from_str::<GenerationResponse>(response_text)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| response_text.trim().to_string(), |e| e.message);

        RelayError::Status { status, message }
    }

    fn extract_text(response: GenerationResponse) -> RelayResult<String> {
        if let Some(error) = response.error {
            return Err(RelayError::Api(error.message));
        }

        match response.text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(RelayError::EmptyResponse),
        }
    }
}

#[async_trait]
impl TextGenerator for UpstreamClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    fn is_configured(&self) -> bool {
        self.config.has_api_key()
    }

    #[instrument(skip(self, prompt, question))]
    async fn generate(&self, prompt: &str, question: &str) -> RelayResult<String> {
        let api_key = self.config.api_key().ok_or(RelayError::MissingCredential)?;
        let body = self.build_request(prompt, question);

        debug!(
            endpoint = %self.config.endpoint,
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending prompt upstream"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            error!(status = %status, "Upstream API error");
            return Err(Self::map_api_error(status.as_u16(), &response_text));
        }

        let parsed: GenerationResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!(error = %e, "Failed to parse upstream response");
            RelayError::MalformedResponse(e.to_string())
        })?;

        let text = Self::extract_text(parsed)?;
        debug!(reply_len = text.len(), "Received upstream reply");
        Ok(text)
    }
}

// ============================================
// Request/Response DTOs
// ============================================

/// Body POSTed to the upstream endpoint
#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    question: &'a str,
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<UpstreamErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    message: String,
}

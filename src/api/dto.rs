//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analysis::{HealthAnalysis, HealthMetrics};

// ============================================
// CHAT DTOs
// ============================================

/// Chat request
///
/// Both fields may be absent or `null`; an empty message is forwarded as-is.
/// The body must be a JSON object.
#[derive(Debug, Default, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct ChatRequest {
    /// The user's free-text message
    pub message: Option<String>,
    /// Health metrics snapshot
    pub health_context: Option<HealthMetrics>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequestFields {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    health_context: Option<HealthMetrics>,
}

impl TryFrom<Map<String, Value>> for ChatRequest {
    type Error = serde_json::Error;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let fields: ChatRequestFields = serde_json::from_value(Value::Object(map))?;

        Ok(Self {
            message: fields.message,
            health_context: fields.health_context,
        })
    }
}

/// Successful chat response
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Always "success"
    pub status: String,
    /// Reply text from the upstream API
    pub message: String,
    /// Analysis embedded into the prompt
    pub analysis: HealthAnalysis,
}

impl ChatResponse {
    pub fn success(message: String, analysis: HealthAnalysis) -> Self {
        Self {
            status: "success".to_string(),
            message,
            analysis,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "degraded"
    pub status: String,
    /// Whether an upstream credential is configured
    pub upstream_configured: bool,
    /// Upstream generator (model) name
    pub model: String,
    /// Seconds since the server started
    pub uptime_seconds: u64,
    /// Server version
    pub version: String,
}

//! Relay error types
//!
//! Every way the upstream round-trip can fail. The HTTP layer decides
//! which status code each one becomes.

use thiserror::Error;

/// Errors that can occur when relaying a prompt upstream
#[derive(Error, Debug)]
pub enum RelayError {
    /// No bearer credential configured; the upstream is never contacted
    #[error("No API key configured")]
    MissingCredential,

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Upstream did not answer within the configured timeout
    #[error("Upstream request timed out after {0}s")]
    Timeout(u64),

    /// Connection or other transport failure
    #[error("Upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Upstream API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Upstream signalled an error inside a success response
    #[error("Upstream API error: {0}")]
    Api(String),

    /// Upstream succeeded but returned no text
    #[error("No response content from upstream API")]
    EmptyResponse,

    /// Upstream body could not be parsed
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),
}

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

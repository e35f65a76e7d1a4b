//! # Fare Error Types
//!
//! Typed error handling for the fare gateway.
//! All gateway operations return `Result<T, FareError>`.

use thiserror::Error;

/// Core error type for all gateway operations
#[derive(Debug, Error)]
pub enum FareError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid caller input (missing/invalid amount or descriptor)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The external processor returned a non-success status
    #[error("Processor error: {message}")]
    Upstream {
        message: String,
        /// Upstream error body, forwarded to the caller when available
        detail: Option<serde_json::Value>,
    },

    /// Network/HTTP error reaching the processor or price feed
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream responded 2xx but with a body we could not use
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),
}

impl FareError {
    /// Build an upstream error from a status line and the raw body text.
    /// The body is forwarded verbatim as the `detail` field when it parses
    /// as JSON, or wrapped as a JSON string otherwise.
    pub fn upstream(message: impl Into<String>, body: &str) -> Self {
        let detail = if body.is_empty() {
            None
        } else {
            Some(
                serde_json::from_str(body)
                    .unwrap_or_else(|_| serde_json::Value::String(body.to_string())),
            )
        };
        FareError::Upstream {
            message: message.into(),
            detail,
        }
    }

    /// Returns the HTTP status code appropriate for this error.
    ///
    /// Input-validation faults map to 400; everything else is a
    /// processing/upstream fault and maps to 500.
    pub fn status_code(&self) -> u16 {
        match self {
            FareError::InvalidRequest(_) => 400,
            FareError::Configuration(_)
            | FareError::Upstream { .. }
            | FareError::Network(_)
            | FareError::MalformedResponse(_) => 500,
        }
    }

    /// Detail payload for the error response body, mirroring what the
    /// processor said when we have it.
    pub fn detail(&self) -> Option<serde_json::Value> {
        match self {
            FareError::Upstream { detail, .. } => detail.clone(),
            FareError::Network(msg) | FareError::MalformedResponse(msg) => {
                Some(serde_json::Value::String(msg.clone()))
            }
            _ => None,
        }
    }
}

/// Result type alias for gateway operations
pub type FareResult<T> = Result<T, FareError>;

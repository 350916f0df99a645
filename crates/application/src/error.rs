//! Application-level errors

use domain::{DomainError, MessageRecord};
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Required configuration is absent for the selected transport.
    /// Fatal, never retried, raised before any network call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network, auth, or API-level failure of a single send attempt
    #[error("Transport error: {0}")]
    Transport(String),

    /// The retry ceiling was reached without a successful delivery
    #[error("Delivery via {transport} failed after {attempts} attempts")]
    DeliveryExhausted {
        /// Total attempts made, including the first one
        attempts: u32,
        /// Name of the transport that was exhausted
        transport: String,
        /// The failure of the last attempt
        #[source]
        source: Box<ApplicationError>,
    },

    /// The candidate text itself reports that the upstream LLM call failed
    /// (auth/permission failure surfaced as text). Aborts the extraction.
    #[error("Upstream generation failed: {0}")]
    UpstreamFailure(String),

    /// No message in the sequence yielded a schema-valid analysis result
    #[error("No valid analysis payload found in {} message record(s)", .messages.len())]
    NoAnalysisPayload {
        /// The full input sequence, kept for diagnosis
        messages: Vec<MessageRecord>,
    },
}

impl ApplicationError {
    /// Check if this error is worth another send attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

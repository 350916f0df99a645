//! Mail transport errors

use application::ApplicationError;
use thiserror::Error;

/// Errors raised by a single send attempt
#[derive(Debug, Error)]
pub enum MailError {
    /// Network connection error
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid email address format
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// RFC 5322 message could not be assembled
    #[error("Failed to build message: {0}")]
    MessageBuild(String),

    /// SMTP-level failure (relay rejected the submission)
    #[error("SMTP error: {0}")]
    Smtp(String),

    /// Hosted API returned a non-2xx status
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    /// General request failure
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Request timed out
    #[error("Timeout after {0}ms")]
    Timeout(u64),

    /// 2xx response whose body did not match the expected schema
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(30_000)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

impl From<MailError> for ApplicationError {
    fn from(err: MailError) -> Self {
        match err {
            // Bad addresses or an unbuildable message won't improve on retry
            e @ (MailError::InvalidAddress(_) | MailError::MessageBuild(_)) => {
                Self::Configuration(e.to_string())
            },
            e => Self::Transport(e.to_string()),
        }
    }
}

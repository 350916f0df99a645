//! Transport settings
//!
//! Credentials are `SecretString` so they are zeroized on drop and redacted
//! from `Debug` output.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// SMTP relay settings
#[derive(Clone, Deserialize)]
pub struct SmtpSettings {
    /// Relay hostname
    pub host: String,

    /// Relay port
    pub port: u16,

    /// Implicit TLS when true, STARTTLS otherwise
    pub secure: bool,

    /// AUTH username
    #[serde(default)]
    pub username: String,

    /// AUTH password (sensitive)
    #[serde(default = "empty_secret")]
    pub password: SecretString,
}

impl SmtpSettings {
    /// Check both credentials are present
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.expose_secret().is_empty()
    }
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "smtp.163.com".to_string(),
            port: 465,
            secure: true,
            username: String::new(),
            password: empty_secret(),
        }
    }
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Resend hosted API settings
#[derive(Clone, Deserialize)]
pub struct ResendSettings {
    /// API key (sensitive)
    #[serde(default = "empty_secret")]
    pub api_key: SecretString,
}

impl ResendSettings {
    /// Create settings from a key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
        }
    }

    /// Check the API key is present
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for ResendSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendSettings")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

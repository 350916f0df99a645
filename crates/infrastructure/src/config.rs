//! Application configuration
//!
//! The environment variable names below are a contract with the surrounding
//! deployment (CI secrets), so they are read flat and verbatim rather than
//! behind an app prefix: `SMTP_HOST`, `SMTP_PORT`, `SMTP_SECURE`,
//! `SMTP_USER`, `SMTP_PASSWORD`, `RESEND_API_KEY`, `EMAIL_FROM`, `EMAIL_TO`,
//! `EMAIL_TRANSPORT`, `EMAIL_SEND_ENABLED`, `ENVIRONMENT`.
//!
//! Resolution is idempotent and never rejects a misconfigured transport at
//! load time; credentials are validated by the transport itself when a send
//! is actually attempted.

use std::fmt;

use application::{DispatchPolicy, DispatchSettings};
use integration_mail::{ResendSettings, SmtpSettings};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Application environment (development or production)
///
/// Development routes every delivery to the log preview path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment - digests are previewed, never sent
    Development,
    /// Production environment - digests are sent (default)
    #[default]
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Mail transport selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportSelection {
    /// Direct SMTP relay submission
    Smtp,
    /// Resend hosted API
    #[serde(alias = "hosted-api")]
    Resend,
    /// No transport; deliveries are previewed to the log
    Disabled,
}

impl TransportSelection {
    /// Check if a live transport is selected
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

impl fmt::Display for TransportSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Smtp => write!(f, "smtp"),
            Self::Resend => write!(f, "resend"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// Resolved application configuration, constructed once at process start
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// `ENVIRONMENT`
    #[serde(default)]
    pub environment: Environment,

    /// `EMAIL_TRANSPORT`; when unset the transport is inferred from
    /// credential presence
    #[serde(default)]
    pub email_transport: Option<TransportSelection>,

    /// `EMAIL_SEND_ENABLED` master switch
    #[serde(default = "default_true")]
    pub email_send_enabled: bool,

    /// `EMAIL_FROM` sender address
    #[serde(default)]
    pub email_from: String,

    /// `EMAIL_TO` recipient address
    #[serde(default)]
    pub email_to: String,

    /// `SMTP_HOST`
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// `SMTP_PORT`
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// `SMTP_SECURE` - implicit TLS when true, STARTTLS otherwise
    #[serde(default = "default_true")]
    pub smtp_secure: bool,

    /// `SMTP_USER`
    #[serde(default)]
    pub smtp_user: String,

    /// `SMTP_PASSWORD` (sensitive)
    #[serde(default = "empty_secret")]
    pub smtp_password: SecretString,

    /// `RESEND_API_KEY` (sensitive)
    #[serde(default = "empty_secret")]
    pub resend_api_key: SecretString,
}

const fn default_true() -> bool {
    true
}

fn default_smtp_host() -> String {
    "smtp.163.com".to_string()
}

const fn default_smtp_port() -> u16 {
    465
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            email_transport: None,
            email_send_enabled: true,
            email_from: String::new(),
            email_to: String::new(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_secure: true,
            smtp_user: String::new(),
            smtp_password: empty_secret(),
            resend_api_key: empty_secret(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("smtp_host", default_smtp_host())?
            .set_default("smtp_port", i64::from(default_smtp_port()))?
            .set_default("smtp_secure", true)?
            .set_default("email_send_enabled", true)?
            .add_source(config::Environment::default().try_parsing(true));

        builder.build()?.try_deserialize()
    }

    /// Resolve the transport to use.
    ///
    /// An explicit `EMAIL_TRANSPORT` wins; otherwise Resend is inferred
    /// whenever SMTP credentials are absent.
    #[must_use]
    pub fn transport_selection(&self) -> TransportSelection {
        if let Some(mode) = self.email_transport {
            return mode;
        }
        if self.smtp_user.is_empty() || self.smtp_password.expose_secret().is_empty() {
            TransportSelection::Resend
        } else {
            TransportSelection::Smtp
        }
    }

    /// SMTP transport settings
    #[must_use]
    pub fn smtp_settings(&self) -> SmtpSettings {
        SmtpSettings {
            host: self.smtp_host.clone(),
            port: self.smtp_port,
            secure: self.smtp_secure,
            username: self.smtp_user.clone(),
            password: self.smtp_password.clone(),
        }
    }

    /// Resend transport settings
    #[must_use]
    pub fn resend_settings(&self) -> ResendSettings {
        ResendSettings {
            api_key: self.resend_api_key.clone(),
        }
    }

    /// Dispatch settings for the application service
    #[must_use]
    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            from: self.email_from.clone(),
            to: self.email_to.clone(),
            send_enabled: self.email_send_enabled && self.transport_selection().is_enabled(),
            development: self.environment == Environment::Development,
            policy: DispatchPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_selector_wins_over_inference() {
        let config = AppConfig {
            email_transport: Some(TransportSelection::Smtp),
            ..AppConfig::default()
        };
        assert_eq!(config.transport_selection(), TransportSelection::Smtp);
    }

    #[test]
    fn missing_smtp_credentials_infer_resend() {
        let config = AppConfig::default();
        assert_eq!(config.transport_selection(), TransportSelection::Resend);
    }

    #[test]
    fn present_smtp_credentials_infer_smtp() {
        let config = AppConfig {
            smtp_user: "digest@example.com".to_string(),
            smtp_password: SecretString::from("hunter2".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(config.transport_selection(), TransportSelection::Smtp);
    }

    #[test]
    fn disabled_transport_turns_sending_off() {
        let config = AppConfig {
            email_transport: Some(TransportSelection::Disabled),
            ..AppConfig::default()
        };
        assert!(!config.dispatch_settings().send_enabled);
    }

    #[test]
    fn development_environment_flows_into_settings() {
        let config = AppConfig {
            environment: Environment::Development,
            ..AppConfig::default()
        };
        assert!(config.dispatch_settings().development);
    }

    #[test]
    fn environment_parses_aliases() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn transport_selection_accepts_hosted_api_alias() {
        let selection: TransportSelection =
            serde_json::from_str("\"hosted-api\"").unwrap();
        assert_eq!(selection, TransportSelection::Resend);
    }

    #[test]
    fn defaults_match_deployment_contract() {
        let config = AppConfig::default();
        assert_eq!(config.smtp_host, "smtp.163.com");
        assert_eq!(config.smtp_port, 465);
        assert!(config.smtp_secure);
        assert!(config.email_send_enabled);
        assert_eq!(config.environment, Environment::Production);
    }
}

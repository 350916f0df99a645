//! Resend hosted API transport
//!
//! One authenticated HTTPS POST per send attempt. A non-2xx response is a
//! transport failure carrying the response body; a 2xx response supplies the
//! provider message id and the raw body becomes the recorded response.

use std::time::Duration;

use application::{ApplicationError, MailerPort};
use async_trait::async_trait;
use domain::{DeliveryOutcome, Envelope};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{MailError, ResendSettings};

/// Production API endpoint
pub const RESEND_ENDPOINT: &str = "https://api.resend.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Resend transport behind `MailerPort`
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    base_url: String,
    settings: ResendSettings,
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: String,
}

impl ResendMailer {
    /// Create a mailer against the production endpoint
    #[must_use]
    pub fn new(settings: ResendSettings) -> Self {
        Self::with_base_url(settings, RESEND_ENDPOINT)
    }

    /// Create a mailer against a custom base URL (tests)
    #[must_use]
    pub fn with_base_url(settings: ResendSettings, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            settings,
        }
    }

    async fn submit(&self, envelope: &Envelope) -> Result<DeliveryOutcome, MailError> {
        let request = SendEmailRequest {
            from: &envelope.from,
            to: [&envelope.to],
            subject: &envelope.subject,
            html: &envelope.html_body,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(self.settings.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(MailError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SendEmailResponse =
            serde_json::from_str(&body).map_err(|e| MailError::InvalidResponse(e.to_string()))?;
        debug!(message_id = %parsed.id, "Resend accepted submission");

        Ok(DeliveryOutcome {
            message_id: parsed.id,
            provider_response: body,
        })
    }
}

#[async_trait]
impl MailerPort for ResendMailer {
    fn name(&self) -> &'static str {
        "resend"
    }

    fn validate_config(&self) -> Result<(), ApplicationError> {
        if !self.settings.has_credentials() {
            return Err(ApplicationError::Configuration(
                "Resend API key is not configured (RESEND_API_KEY)".to_string(),
            ));
        }
        Ok(())
    }

    #[instrument(skip(self, envelope), fields(to = %envelope.to, subject = %envelope.subject))]
    async fn send(&self, envelope: &Envelope) -> Result<DeliveryOutcome, ApplicationError> {
        let outcome = self.submit(envelope).await?;
        Ok(outcome)
    }
}

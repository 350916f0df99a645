//! SMTP relay transport
//!
//! Submits the digest over lettre's async SMTP transport. Implicit TLS
//! (SMTPS) when the relay is flagged secure, STARTTLS otherwise, PLAIN
//! authentication either way. A fresh connection per send is fine here;
//! the pipeline delivers one email a day.

use application::{ApplicationError, MailerPort};
use async_trait::async_trait;
use domain::{DeliveryOutcome, Envelope};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
    message::{Message, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use crate::{MailError, SmtpSettings};

/// SMTP transport behind `MailerPort`
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    /// Create a new SMTP mailer. Credentials are not checked here; see
    /// `validate_config`.
    #[must_use]
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    fn build_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let credentials = Credentials::new(
            self.settings.username.clone(),
            self.settings.password.expose_secret().to_string(),
        );

        let builder = if self.settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.host)
        }
        .map_err(|e| MailError::ConnectionFailed(e.to_string()))?;

        Ok(builder
            .port(self.settings.port)
            .credentials(credentials)
            .build())
    }

    /// Generate a Message-ID of the form `<millis.uuid@sender-domain>`
    fn generate_message_id(from: &str) -> String {
        let domain = from.split_once('@').map_or("localhost", |(_, d)| d);
        format!(
            "<{}.{}@{}>",
            chrono::Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4(),
            domain
        )
    }

    async fn submit(&self, envelope: &Envelope) -> Result<DeliveryOutcome, MailError> {
        let message_id = Self::generate_message_id(&envelope.from);

        let message = Message::builder()
            .from(envelope.from.parse().map_err(|e| {
                MailError::InvalidAddress(format!("from \"{}\": {e}", envelope.from))
            })?)
            .to(envelope
                .to
                .parse()
                .map_err(|e| MailError::InvalidAddress(format!("to \"{}\": {e}", envelope.to)))?)
            .subject(envelope.subject.clone())
            .message_id(Some(message_id.clone()))
            .header(ContentType::TEXT_HTML)
            .body(envelope.html_body.clone())
            .map_err(|e| MailError::MessageBuild(e.to_string()))?;

        let transport = self.build_transport()?;
        let response = transport
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;

        let provider_response = response.message().collect::<Vec<&str>>().join(" ");
        debug!(message_id = %message_id, "Relay accepted submission");

        Ok(DeliveryOutcome {
            message_id,
            provider_response,
        })
    }
}

#[async_trait]
impl MailerPort for SmtpMailer {
    fn name(&self) -> &'static str {
        "smtp"
    }

    fn validate_config(&self) -> Result<(), ApplicationError> {
        if !self.settings.has_credentials() {
            return Err(ApplicationError::Configuration(
                "SMTP credentials are not configured (SMTP_USER / SMTP_PASSWORD)".to_string(),
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

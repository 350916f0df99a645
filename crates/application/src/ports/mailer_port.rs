//! Mail transport port

use async_trait::async_trait;
use domain::{DeliveryOutcome, Envelope};

use crate::error::ApplicationError;

/// A concrete mechanism for sending an email (SMTP relay, hosted API).
///
/// Exactly one implementation is selected per process from configuration.
/// Credential checks are deliberately deferred to `validate_config` so that a
/// misconfigured but unused transport never blocks startup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailerPort: Send + Sync {
    /// Transport name for log lines and error messages
    fn name(&self) -> &'static str;

    /// Verify the credentials this transport needs are present.
    ///
    /// Called once per `deliver`, before the first send attempt.
    fn validate_config(&self) -> Result<(), ApplicationError>;

    /// Submit the envelope. A failure here counts as one attempt.
    async fn send(&self, envelope: &Envelope) -> Result<DeliveryOutcome, ApplicationError>;
}

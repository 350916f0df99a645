//! Digest dispatch service
//!
//! Owns the transport/retry state machine for a single digest delivery:
//! `Idle -> Attempting -> {Succeeded | Retrying -> Attempting | Exhausted}`.
//! Retries use a fixed delay with no backoff and no jitter; this runs once a
//! day, not at QPS where thundering herd matters.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use domain::{DeliveryRequest, Envelope, digest_subject};
use tracing::{error, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::MailerPort;

/// Retry policy for a single delivery
#[derive(Debug, Clone)]
pub struct DispatchPolicy {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Fixed delay between attempts
    pub retry_delay: Duration,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// Resolved delivery settings, constructed once at process start
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// Sender address
    pub from: String,
    /// Recipient address
    pub to: String,
    /// Master switch; when false the digest is only previewed to the log
    pub send_enabled: bool,
    /// Development mode also routes to the preview path
    pub development: bool,
    /// Retry policy
    pub policy: DispatchPolicy,
}

/// Service that delivers one rendered digest per pipeline run
pub struct DispatchService {
    mailer: Option<Arc<dyn MailerPort>>,
    settings: DispatchSettings,
}

impl std::fmt::Debug for DispatchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchService")
            .field("settings", &self.settings)
            .field(
                "transport",
                &self.mailer.as_ref().map(|m| m.name()).unwrap_or("none"),
            )
            .finish()
    }
}

impl DispatchService {
    /// Create a new dispatch service.
    ///
    /// `mailer` is `None` when no transport could be resolved from
    /// configuration; that only becomes an error if a live send is attempted.
    #[must_use]
    pub fn new(mailer: Option<Arc<dyn MailerPort>>, settings: DispatchSettings) -> Self {
        Self { mailer, settings }
    }

    /// Deliver the digest, or preview it to the log when sending is off.
    ///
    /// The subject line is computed once before the first attempt and reused
    /// verbatim for every retry.
    #[instrument(skip(self, request), fields(html_len = request.html_body.len()))]
    pub async fn deliver(&self, request: &DeliveryRequest) -> Result<(), ApplicationError> {
        if !self.settings.send_enabled || self.settings.development {
            info!(
                html_len = request.html_body.len(),
                "Sending disabled or development mode, previewing digest instead"
            );
            info!(preview = %request.html_body, "Digest preview");
            return Ok(());
        }

        let mailer = self.mailer.as_ref().ok_or_else(|| {
            ApplicationError::Configuration("no mail transport configured".to_string())
        })?;

        if self.settings.from.is_empty() || self.settings.to.is_empty() {
            return Err(ApplicationError::Configuration(
                "from/to addresses are not configured".to_string(),
            ));
        }

        mailer.validate_config()?;

        let subject = digest_subject(
            request.language_tag.as_deref(),
            Utc::now().date_naive(),
        );
        let envelope = Envelope {
            from: self.settings.from.clone(),
            to: self.settings.to.clone(),
            subject,
            html_body: request.html_body.clone(),
        };

        self.send_with_retry(mailer.as_ref(), &envelope).await
    }

    async fn send_with_retry(
        &self,
        mailer: &dyn MailerPort,
        envelope: &Envelope,
    ) -> Result<(), ApplicationError> {
        let policy = &self.settings.policy;
        let mut attempts = 0u32;

        loop {
            attempts += 1;

            match mailer.send(envelope).await {
                Ok(outcome) => {
                    info!(
                        message_id = %outcome.message_id,
                        transport = mailer.name(),
                        response = %outcome.provider_response,
                        attempts,
                        "Digest email sent"
                    );
                    return Ok(());
                },
                Err(err) if !err.is_retryable() => {
                    error!(
                        transport = mailer.name(),
                        error = %err,
                        "Send failed with non-retryable error"
                    );
                    return Err(err);
                },
                Err(err) => {
                    let retries_used = attempts - 1;
                    if retries_used >= policy.max_retries {
                        error!(
                            attempts,
                            transport = mailer.name(),
                            error = %err,
                            "Delivery failed, retry ceiling reached"
                        );
                        return Err(ApplicationError::DeliveryExhausted {
                            attempts,
                            transport: mailer.name().to_string(),
                            source: Box::new(err),
                        });
                    }

                    warn!(
                        attempt = attempts,
                        max_retries = policy.max_retries,
                        delay = ?policy.retry_delay,
                        error = %err,
                        "Send attempt failed, retrying"
                    );
                    tokio::time::sleep(policy.retry_delay).await;
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use domain::DeliveryOutcome;

    use super::*;
    use crate::ports::MockMailerPort;

    fn settings() -> DispatchSettings {
        DispatchSettings {
            from: "digest@example.com".to_string(),
            to: "reader@example.com".to_string(),
            send_enabled: true,
            development: false,
            policy: DispatchPolicy {
                max_retries: 3,
                retry_delay: Duration::from_millis(1),
            },
        }
    }

    fn outcome() -> DeliveryOutcome {
        DeliveryOutcome {
            message_id: "msg-1".to_string(),
            provider_response: "250 OK".to_string(),
        }
    }

    #[tokio::test]
    async fn preview_path_never_touches_the_transport() {
        let mut mock = MockMailerPort::new();
        mock.expect_validate_config().times(0);
        mock.expect_send().times(0);

        let service = DispatchService::new(
            Some(Arc::new(mock)),
            DispatchSettings {
                send_enabled: false,
                ..settings()
            },
        );

        let request = DeliveryRequest::new("<h1>digest</h1>");
        service.deliver(&request).await.unwrap();
    }

    #[tokio::test]
    async fn development_mode_previews_even_when_sending_enabled() {
        let mut mock = MockMailerPort::new();
        mock.expect_validate_config().times(0);
        mock.expect_send().times(0);

        let service = DispatchService::new(
            Some(Arc::new(mock)),
            DispatchSettings {
                development: true,
                ..settings()
            },
        );

        service
            .deliver(&DeliveryRequest::new("<p>hi</p>"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn missing_transport_is_a_configuration_error() {
        let service = DispatchService::new(None, settings());
        let err = service
            .deliver(&DeliveryRequest::new("<p>hi</p>"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }

    #[tokio::test]
    async fn invalid_credentials_fail_before_any_attempt() {
        let mut mock = MockMailerPort::new();
        mock.expect_validate_config()
            .times(1)
            .returning(|| Err(ApplicationError::Configuration("no password".to_string())));
        mock.expect_send().times(0);

        let service = DispatchService::new(Some(Arc::new(mock)), settings());
        let err = service
            .deliver(&DeliveryRequest::new("<p>hi</p>"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }

    #[tokio::test]
    async fn succeeds_after_two_retries_with_stable_subject() {
        let subjects: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&subjects);

        let mut mock = MockMailerPort::new();
        mock.expect_name().return_const("stub");
        mock.expect_validate_config().returning(|| Ok(()));
        mock.expect_send().times(3).returning(move |envelope| {
            let mut log = seen.lock().unwrap();
            log.push(envelope.subject.clone());
            if log.len() < 3 {
                Err(ApplicationError::Transport("connection reset".to_string()))
            } else {
                Ok(outcome())
            }
        });

        let service = DispatchService::new(Some(Arc::new(mock)), settings());
        service
            .deliver(&DeliveryRequest::new("<p>hi</p>").with_language("zh"))
            .await
            .unwrap();

        let log = subjects.lock().unwrap();
        assert_eq!(log.len(), 3);
        assert!(log[0].starts_with("GitHub Trending Digest [zh] - "));
        assert!(log.iter().all(|s| s == &log[0]), "subject changed across retries");
    }

    #[tokio::test]
    async fn exhausts_after_four_attempts() {
        let mut mock = MockMailerPort::new();
        mock.expect_name().return_const("stub");
        mock.expect_validate_config().returning(|| Ok(()));
        mock.expect_send()
            .times(4)
            .returning(|_| Err(ApplicationError::Transport("always down".to_string())));

        let service = DispatchService::new(Some(Arc::new(mock)), settings());
        let err = service
            .deliver(&DeliveryRequest::new("<p>hi</p>"))
            .await
            .unwrap_err();

        let ApplicationError::DeliveryExhausted {
            attempts,
            transport,
            source,
        } = err
        else {
            unreachable!("Expected DeliveryExhausted, got {err:?}");
        };
        assert_eq!(attempts, 4);
        assert_eq!(transport, "stub");
        assert!(matches!(*source, ApplicationError::Transport(_)));
    }

    #[tokio::test]
    async fn non_retryable_send_error_is_not_retried() {
        let mut mock = MockMailerPort::new();
        mock.expect_name().return_const("stub");
        mock.expect_validate_config().returning(|| Ok(()));
        mock.expect_send()
            .times(1)
            .returning(|_| Err(ApplicationError::Configuration("rejected".to_string())));

        let service = DispatchService::new(Some(Arc::new(mock)), settings());
        let err = service
            .deliver(&DeliveryRequest::new("<p>hi</p>"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }

    #[tokio::test]
    async fn empty_addresses_fail_fast() {
        let mut mock = MockMailerPort::new();
        mock.expect_send().times(0);

        let service = DispatchService::new(
            Some(Arc::new(mock)),
            DispatchSettings {
                from: String::new(),
                ..settings()
            },
        );
        let err = service
            .deliver(&DeliveryRequest::new("<p>hi</p>"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }
}

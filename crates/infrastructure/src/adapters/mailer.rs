//! Mail transport factory
//!
//! Selects exactly one transport per the resolved configuration. Construction
//! never fails: missing credentials surface from `validate_config` at send
//! time, not here.

use std::sync::Arc;

use application::{DispatchService, MailerPort};
use integration_mail::{ResendMailer, SmtpMailer};
use tracing::info;

use crate::config::{AppConfig, TransportSelection};

/// Build the mail transport for the resolved selection.
///
/// `None` when the transport is disabled; the dispatch service then only
/// ever takes the preview path (or fails a live send with a configuration
/// error, which cannot happen through `dispatch_settings`).
#[must_use]
pub fn build_mailer(config: &AppConfig) -> Option<Arc<dyn MailerPort>> {
    let selection = config.transport_selection();
    info!(transport = %selection, "Resolved mail transport");

    match selection {
        TransportSelection::Smtp => Some(Arc::new(SmtpMailer::new(config.smtp_settings()))),
        TransportSelection::Resend => Some(Arc::new(ResendMailer::new(config.resend_settings()))),
        TransportSelection::Disabled => None,
    }
}

/// Build the fully wired dispatch service
#[must_use]
pub fn build_dispatch_service(config: &AppConfig) -> DispatchService {
    DispatchService::new(build_mailer(config), config.dispatch_settings())
}

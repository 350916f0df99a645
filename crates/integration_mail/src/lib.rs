//! Mail transport integrations
//!
//! Two interchangeable implementations of the application's `MailerPort`:
//! a direct SMTP relay submission (lettre) and the Resend hosted API
//! (reqwest). Which one a process uses is decided once from configuration
//! by the infrastructure layer; credential checks are deferred to
//! `validate_config` so an unused transport never blocks startup.

mod config;
mod error;
mod resend;
mod smtp;

pub use config::{ResendSettings, SmtpSettings};
pub use error::MailError;
pub use resend::{RESEND_ENDPOINT, ResendMailer};
pub use smtp::SmtpMailer;

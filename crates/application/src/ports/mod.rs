//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the integration crates implement them.

mod mailer_port;

pub use mailer_port::MailerPort;
#[cfg(test)]
pub use mailer_port::MockMailerPort;

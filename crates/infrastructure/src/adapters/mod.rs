//! Adapters wiring integration crates to application ports

mod mailer;

pub use mailer::{build_dispatch_service, build_mailer};

//! Infrastructure layer for trend-digest
//!
//! Resolves the environment-sourced configuration contract, wires the mail
//! transport adapters to the application's port, and initializes tracing.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::{build_dispatch_service, build_mailer};
pub use config::{AppConfig, Environment, TransportSelection};
pub use telemetry::init_tracing;

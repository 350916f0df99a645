//! Application layer - Use cases and orchestration
//!
//! Contains the digest dispatch use case, the analysis extractor, and the
//! port definition implemented by the mail transport adapters.

pub mod error;
pub mod extractor;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use extractor::extract_analysis;
pub use ports::*;
pub use services::*;

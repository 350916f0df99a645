//! Domain layer for trend-digest
//!
//! Contains the core types of the digest pipeline: the delivery request and
//! envelope handed to mail transports, and the analysis result recovered from
//! streamed assistant messages. This layer has no I/O dependencies.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::DomainError;

//! Domain entities

mod analysis;
mod digest;

pub use analysis::{AnalysisResult, ContentItem, MessageRecord};
pub use digest::{DIGEST_TITLE, DeliveryOutcome, DeliveryRequest, Envelope, digest_subject};

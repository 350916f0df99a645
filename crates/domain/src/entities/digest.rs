//! Digest delivery types
//!
//! The daily digest is rendered to HTML upstream; this module defines the
//! request handed to the dispatcher, the envelope handed to a mail transport,
//! and the outcome reported back by a provider.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Subject prefix for every digest email
pub const DIGEST_TITLE: &str = "GitHub Trending Digest";

/// A single digest delivery, constructed per pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRequest {
    /// Pre-rendered HTML report body
    pub html_body: String,

    /// Optional language tag shown in the subject line (e.g. "zh")
    #[serde(default)]
    pub language_tag: Option<String>,
}

impl DeliveryRequest {
    /// Create a request for an HTML report without a language tag
    #[must_use]
    pub fn new(html_body: impl Into<String>) -> Self {
        Self {
            html_body: html_body.into(),
            language_tag: None,
        }
    }

    /// Attach a language tag
    #[must_use]
    pub fn with_language(mut self, tag: impl Into<String>) -> Self {
        self.language_tag = Some(tag.into());
        self
    }
}

/// The from/to/subject/body tuple handed to a mail transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Result of a successful delivery, logged and then discarded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    /// Message ID assigned by us or by the provider
    pub message_id: String,
    /// Raw provider response, for the audit log line
    pub provider_response: String,
}

/// Compute the digest subject line for a given calendar date.
///
/// The subject is computed once per delivery and must stay stable across
/// retry attempts, so the date is passed in rather than read from the clock.
#[must_use]
pub fn digest_subject(language_tag: Option<&str>, date: NaiveDate) -> String {
    match language_tag {
        Some(tag) => format!("{DIGEST_TITLE} [{tag}] - {date}"),
        None => format!("{DIGEST_TITLE} - {date}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn subject_without_language_tag() {
        let subject = digest_subject(None, date(2025, 2, 15));
        assert_eq!(subject, "GitHub Trending Digest - 2025-02-15");
    }

    #[test]
    fn subject_with_language_tag() {
        let subject = digest_subject(Some("zh"), date(2025, 2, 15));
        assert_eq!(subject, "GitHub Trending Digest [zh] - 2025-02-15");
    }

    #[test]
    fn request_builder_sets_language() {
        let request = DeliveryRequest::new("<html></html>").with_language("en");
        assert_eq!(request.language_tag.as_deref(), Some("en"));
        assert_eq!(request.html_body, "<html></html>");
    }
}

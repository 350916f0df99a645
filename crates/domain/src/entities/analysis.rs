//! Analysis result and streamed message records
//!
//! The trending analysis is produced by an external LLM tool invocation that
//! streams a sequence of message records. Only two record kinds carry text we
//! care about; everything else is ignored. The schema is owned by that
//! collaborator, so unknown kinds and unknown fields must deserialize cleanly.

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// One record of the streamed message sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageRecord {
    /// Assistant turn carrying a list of content items
    Assistant {
        #[serde(default)]
        content: Vec<ContentItem>,
    },

    /// Final result record carrying the aggregated output text
    Result {
        #[serde(default)]
        result: String,
    },

    /// Any other record kind (system, tool use, ...) - ignored
    #[serde(other)]
    Other,
}

/// One content item of an assistant message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    /// Plain text block
    Text {
        #[serde(default)]
        text: String,
    },

    /// Any other item kind (tool use, thinking, ...) - ignored
    #[serde(other)]
    Other,
}

/// The structured analysis recovered from the message stream.
///
/// Only `date` and `projects` are required; everything else the model emits
/// passes through untyped in `extra` and is preserved on re-serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Report date as emitted by the model (not reparsed)
    pub date: String,

    /// Analyzed projects; may be empty
    pub projects: Vec<serde_json::Value>,

    /// Additional fields, passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AnalysisResult {
    /// Check the minimal required shape: a non-empty `date`.
    ///
    /// `projects` being an array is already enforced by the type; a payload
    /// where it is missing or not an array never deserializes this far.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.date.is_empty() {
            return Err(DomainError::ValidationError(
                "analysis result has an empty date".to_string(),
            ));
        }
        Ok(())
    }
}

//! Analysis extraction from streamed assistant messages
//!
//! The LLM invocation layer hands us an ordered sequence of message records;
//! somewhere in there is the final JSON payload, wrapped in whatever the model
//! felt like that day: a fenced code block, bare JSON, or JSON buried in
//! prose. Strategies are tried from strictest to loosest, first match wins.

use domain::{AnalysisResult, ContentItem, MessageRecord};
use tracing::{debug, error};

use crate::error::ApplicationError;

/// Literal markers of an upstream API failure surfaced as message text
/// instead of a structured error.
const UPSTREAM_FAILURE_MARKERS: [&str; 3] = ["API Error", "403", "forbidden"];

/// Scan the message sequence, in order, for the analysis payload.
///
/// Assistant text items and result records are fed through [`parse_candidate`];
/// the first schema-valid payload wins. An upstream failure marker anywhere in
/// a candidate aborts the whole extraction.
pub fn extract_analysis(messages: &[MessageRecord]) -> Result<AnalysisResult, ApplicationError> {
    debug!(count = messages.len(), "Scanning message sequence for analysis payload");

    for (index, message) in messages.iter().enumerate() {
        match message {
            MessageRecord::Assistant { content } => {
                for (item_index, item) in content.iter().enumerate() {
                    let ContentItem::Text { text } = item else {
                        continue;
                    };
                    if let Some(result) = parse_candidate(text)? {
                        debug!(
                            message = index,
                            item = item_index,
                            "Extracted analysis from assistant content"
                        );
                        return Ok(result);
                    }
                }
            },
            MessageRecord::Result { result } => {
                if let Some(parsed) = parse_candidate(result)? {
                    debug!(message = index, "Extracted analysis from result record");
                    return Ok(parsed);
                }
            },
            MessageRecord::Other => {},
        }
    }

    error!(
        count = messages.len(),
        "No message yielded a valid analysis result"
    );
    Err(ApplicationError::NoAnalysisPayload {
        messages: messages.to_vec(),
    })
}

/// Parsers from candidate text to a JSON document, strictest first. The first
/// parser that produces a document is terminal: an invalid shape after a
/// successful parse yields "no match" without falling through to the next one.
const STRATEGIES: [fn(&str) -> Option<serde_json::Value>; 2] =
    [parse_json_document, parse_brace_substring];

/// Try to recover an [`AnalysisResult`] from one candidate text.
///
/// Returns `Ok(None)` when the text holds nothing usable (keep scanning), and
/// `Err(UpstreamFailure)` when the text reports a failed upstream call, which
/// must abort the extraction rather than be skipped.
pub fn parse_candidate(text: &str) -> Result<Option<AnalysisResult>, ApplicationError> {
    let text = text.trim();

    if let Some(marker) = UPSTREAM_FAILURE_MARKERS
        .iter()
        .copied()
        .find(|m| text.contains(m))
    {
        error!(
            marker,
            snippet = snippet(text, 200),
            "Candidate text reports an upstream API failure"
        );
        return Err(ApplicationError::UpstreamFailure(format!(
            "upstream call failed ({marker}): {}",
            snippet(text, 200)
        )));
    }

    let candidate = fenced_block(text).unwrap_or(text);

    for strategy in STRATEGIES {
        if let Some(value) = strategy(candidate) {
            return Ok(into_valid_result(value));
        }
    }
    Ok(None)
}

/// Strict parse of the whole candidate text
fn parse_json_document(text: &str) -> Option<serde_json::Value> {
    serde_json::from_str(text).ok()
}

/// Greedy recovery: first `{` to last `}` across the whole text.
///
/// Deliberately greedy; with multiple JSON objects in one candidate this
/// captures everything between them and fails to parse. Kept until a corpus
/// of real inputs shows it misfires.
fn parse_brace_substring(text: &str) -> Option<serde_json::Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start > end {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

/// Shape validation: `date` non-empty, `projects` an array
fn into_valid_result(value: serde_json::Value) -> Option<AnalysisResult> {
    let result: AnalysisResult = serde_json::from_value(value).ok()?;
    result.validate().ok()?;
    Some(result)
}

/// Extract the inner content of the first triple-backtick fenced block,
/// tolerating an optional `json` language tag.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after = &text[start + 3..];
    let after = after.strip_prefix("json").unwrap_or(after);
    let end = after.find("```")?;
    Some(after[..end].trim())
}

/// Char-safe prefix for log lines
fn snippet(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

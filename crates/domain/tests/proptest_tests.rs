//! Property-based tests for domain entities
//!
//! These tests use proptest to verify invariants across many random inputs.

use chrono::NaiveDate;
use domain::{AnalysisResult, DIGEST_TITLE, DeliveryRequest, MessageRecord, digest_subject};
use proptest::prelude::*;

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..13, 1u32..29)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

// ============================================================================
// Subject Line Property Tests
// ============================================================================

mod subject_tests {
    use super::*;

    proptest! {
        #[test]
        fn subject_always_starts_with_title(date in date_strategy()) {
            let subject = digest_subject(None, date);
            prop_assert!(subject.starts_with(DIGEST_TITLE));
        }

        #[test]
        fn subject_ends_with_iso_date(date in date_strategy()) {
            let subject = digest_subject(None, date);
            prop_assert!(subject.ends_with(&date.format("%Y-%m-%d").to_string()));
        }

        #[test]
        fn language_tag_appears_bracketed(
            tag in "[a-zA-Z-]{1,10}",
            date in date_strategy()
        ) {
            let subject = digest_subject(Some(&tag), date);
            let bracketed = format!("[{tag}]");
            prop_assert!(subject.contains(&bracketed));
        }

        #[test]
        fn subject_is_deterministic(
            tag in proptest::option::of("[a-z]{2}"),
            date in date_strategy()
        ) {
            let a = digest_subject(tag.as_deref(), date);
            let b = digest_subject(tag.as_deref(), date);
            prop_assert_eq!(a, b);
        }
    }
}

// ============================================================================
// DeliveryRequest Property Tests
// ============================================================================

mod delivery_request_tests {
    use super::*;

    proptest! {
        #[test]
        fn builder_preserves_body_and_tag(
            body in ".{0,200}",
            tag in "[a-z]{1,5}"
        ) {
            let request = DeliveryRequest::new(body.clone()).with_language(tag.clone());
            prop_assert_eq!(request.html_body, body);
            prop_assert_eq!(request.language_tag, Some(tag));
        }
    }
}

// ============================================================================
// Message Record Property Tests
// ============================================================================

mod message_record_tests {
    use super::*;

    proptest! {
        // Any record with an unrecognized type tag must still deserialize
        #[test]
        fn unknown_record_kinds_deserialize_as_other(kind in "[a-z_]{1,20}") {
            prop_assume!(kind != "assistant" && kind != "result");
            let json = format!(r#"{{"type":"{kind}"}}"#);
            let record: MessageRecord = serde_json::from_str(&json).unwrap();
            prop_assert!(matches!(record, MessageRecord::Other));
        }

        // Extra fields survive a serialize/deserialize round trip untouched
        #[test]
        fn analysis_extra_fields_round_trip(
            date in "[0-9]{4}-[0-9]{2}-[0-9]{2}",
            key in "[a-z]{1,10}",
            value in "[a-zA-Z0-9 ]{0,30}"
        ) {
            prop_assume!(key != "date" && key != "projects");
            let mut obj = serde_json::Map::new();
            obj.insert("date".to_string(), serde_json::Value::String(date));
            obj.insert("projects".to_string(), serde_json::json!([]));
            obj.insert(key.clone(), serde_json::Value::String(value.clone()));

            let result: AnalysisResult =
                serde_json::from_value(serde_json::Value::Object(obj)).unwrap();
            let back = serde_json::to_value(&result).unwrap();
            prop_assert_eq!(back[key.as_str()].as_str(), Some(value.as_str()));
        }
    }
}

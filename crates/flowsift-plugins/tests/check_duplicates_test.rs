//! Integration tests for the duplicate-check pipeline
//!
//! Drives the shared pipeline through a stub record source, covering the
//! full contract: parsing, classification, and the output routing policy.

use async_trait::async_trait;
use serde_json::{json, Value};

use flowsift_core::{Channel, FlowFile, Record};
use flowsift_db::RecordSource;
use flowsift_plugins::check_duplicates::{check_against_source, CheckDuplicatesConfig};

/// Record source serving a fixed reference set, as a pooled or engine
/// source would after running the configured query.
struct StubSource {
    reference: Vec<Record>,
}

impl StubSource {
    fn new(reference: Value) -> Self {
        let reference = reference
            .as_array()
            .expect("stub reference must be an array")
            .iter()
            .map(|v| v.as_object().expect("stub reference rows must be objects").clone())
            .collect();
        Self { reference }
    }

    fn empty() -> Self {
        Self { reference: vec![] }
    }
}

#[async_trait]
impl RecordSource for StubSource {
    async fn fetch(&self, _query: &str) -> flowsift_db::Result<Vec<Record>> {
        Ok(self.reference.clone())
    }
}

fn config() -> CheckDuplicatesConfig {
    CheckDuplicatesConfig {
        query: "SELECT id, name FROM orders".to_string(),
        column_mapping: r#"{"id": "id"}"#.to_string(),
    }
}

#[tokio::test]
async fn mixed_batch_routes_non_duplicates_to_success() {
    let source = StubSource::new(json!([{"id": 1, "name": "dup"}]));
    let flowfile = FlowFile::from_text(r#"[{"id": 1}, {"id": 2}]"#);

    let result = check_against_source(&source, &config(), &flowfile)
        .await
        .unwrap()
        .unwrap();

    // Deliberate policy: the duplicate record {"id": 1} is dropped
    // entirely, not routed anywhere.
    assert_eq!(result.channel, Channel::Success);
    assert_eq!(result.contents, r#"[{"id":2}]"#);
}

#[tokio::test]
async fn all_duplicate_batch_routes_to_duplicate() {
    let source = StubSource::new(json!([{"id": 1}, {"id": 2}]));
    let flowfile = FlowFile::from_text(r#"[{"id": 1}, {"id": 2}]"#);

    let result = check_against_source(&source, &config(), &flowfile)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.channel, Channel::Duplicate);
    assert_eq!(result.contents, r#"[{"id":1},{"id":2}]"#);
}

#[tokio::test]
async fn empty_batch_produces_no_output() {
    let source = StubSource::new(json!([{"id": 1}]));
    let flowfile = FlowFile::from_text("[]");

    let result = check_against_source(&source, &config(), &flowfile)
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn single_object_is_normalized_to_a_batch_of_one() {
    let source = StubSource::empty();
    let flowfile = FlowFile::from_text(r#"{"id": 7}"#);

    let result = check_against_source(&source, &config(), &flowfile)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.channel, Channel::Success);
    assert_eq!(result.contents, r#"[{"id":7}]"#);
}

#[tokio::test]
async fn zero_row_reference_classifies_everything_as_new() {
    let source = StubSource::empty();
    let flowfile = FlowFile::from_text(r#"[{"id": 1}, {"id": 2}]"#);

    let result = check_against_source(&source, &config(), &flowfile)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.channel, Channel::Success);
    assert_eq!(result.contents, r#"[{"id":1},{"id":2}]"#);
}

#[tokio::test]
async fn numeric_and_string_ids_compare_equal() {
    let source = StubSource::new(json!([{"id": "5"}]));
    let flowfile = FlowFile::from_text(r#"[{"id": 5}]"#);

    let result = check_against_source(&source, &config(), &flowfile)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.channel, Channel::Duplicate);
}

#[tokio::test]
async fn malformed_batch_fails_the_invocation() {
    let source = StubSource::empty();
    let flowfile = FlowFile::from_text("{broken");

    let err = check_against_source(&source, &config(), &flowfile)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("JSON"));
}

#[tokio::test]
async fn malformed_mapping_fails_the_invocation() {
    let source = StubSource::empty();
    let config = CheckDuplicatesConfig {
        query: "SELECT 1".to_string(),
        column_mapping: "[1, 2]".to_string(),
    };
    let flowfile = FlowFile::from_text(r#"[{"id": 1}]"#);

    let err = check_against_source(&source, &config, &flowfile)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid field mapping"));
}

#[tokio::test]
async fn source_failure_propagates_uncaught() {
    struct FailingSource;

    #[async_trait]
    impl RecordSource for FailingSource {
        async fn fetch(&self, _query: &str) -> flowsift_db::Result<Vec<Record>> {
            Err(sqlx::Error::PoolClosed.into())
        }
    }

    let flowfile = FlowFile::from_text(r#"[{"id": 1}]"#);
    let err = check_against_source(&FailingSource, &config(), &flowfile)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("record source error"));
}

//! Regression coverage for domain error construction and serialisation.

use super::*;
use rstest::rstest;
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::insufficient_funds("insufficient balance"), ErrorCode::InsufficientFunds)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::not_found("missing") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn serialises_snake_case_code_and_omits_empty_fields() {
    let value = serde_json::to_value(Error::insufficient_funds("insufficient balance"))
        .expect("serialise error");
    assert_eq!(
        value,
        json!({"code": "insufficient_funds", "message": "insufficient balance"})
    );
}

#[rstest]
fn details_and_trace_id_round_trip() {
    let error = Error::invalid_request("missing name")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"field": "name", "code": "missing_field"}));
    let encoded = serde_json::to_string(&error).expect("serialise error");
    let decoded: Error = serde_json::from_str(&encoded).expect("deserialise error");
    assert_eq!(decoded, error);
}

#[rstest]
fn display_renders_message() {
    assert_eq!(
        Error::not_found("account_id x not found").to_string(),
        "account_id x not found"
    );
}

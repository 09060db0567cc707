//! Tests for the domain error payload and its serialised form.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
#[case(Error::invalid_request("x"), ErrorCode::InvalidRequest)]
#[case(Error::unknown_reference("x"), ErrorCode::UnknownReference)]
#[case(Error::duplicate_key("x"), ErrorCode::DuplicateKey)]
#[case(Error::unauthorized("x"), ErrorCode::Unauthorized)]
#[case(Error::not_found("x"), ErrorCode::NotFound)]
#[case(Error::too_many_requests("x"), ErrorCode::TooManyRequests)]
#[case(Error::internal("x"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_substitutes_blank_messages() {
    let err = Error::new(ErrorCode::NotFound, "  ");
    assert_eq!(err.message(), "not found");
}

#[rstest]
fn try_with_trace_id_rejects_empty_values(base_error: Error) {
    let result = base_error.try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn with_trace_id_ignores_blank_values(base_error: Error) {
    let error = base_error.with_trace_id(" ");
    assert!(error.trace_id().is_none());
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_camel_case_envelope(expected_trace_id: String) {
    let error = Error::unknown_reference("parent animals not found")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "missing": ["father", "mother"] }));

    let value = serde_json::to_value(&error).expect("error serialises");
    assert_eq!(
        value,
        json!({
            "code": "unknown_reference",
            "message": "parent animals not found",
            "traceId": expected_trace_id,
            "details": { "missing": ["father", "mother"] },
        })
    );
}

#[rstest]
fn omits_absent_optional_fields(base_error: Error) {
    let value = serde_json::to_value(&base_error).expect("error serialises");
    assert_eq!(value, json!({ "code": "invalid_request", "message": "bad" }));
}

#[rstest]
#[case(json!({ "code": "not_found", "message": "" }))]
#[case(json!({ "code": "not_found", "message": "gone", "traceId": " " }))]
#[case(json!({ "code": "not_found", "message": "gone", "extra": 1 }))]
fn deserialisation_rejects_invalid_payloads(#[case] payload: serde_json::Value) {
    let result: Result<Error, _> = serde_json::from_value(payload);
    assert!(result.is_err());
}

#[rstest]
#[tokio::test]
async fn deserialisation_does_not_capture_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move {
        serde_json::from_value::<Error>(json!({ "code": "duplicate_key", "message": "taken" }))
            .expect("payload deserialises")
    })
    .await;

    assert_eq!(error.code(), ErrorCode::DuplicateKey);
    assert!(error.trace_id().is_none());
}

//! Tests for domain error construction and trace capture.

use super::*;
use rstest::{fixture, rstest};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn trace_id() -> TraceId {
    TRACE_ID.parse().expect("valid UUID literal")
}

#[rstest]
#[case(Error::invalid_request("token required"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("Invalid token"), ErrorCode::Unauthorized)]
#[case(Error::service_unavailable("store down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
#[case("")]
#[case("   ")]
fn blank_message_falls_back_to_code_default(#[case] message: &str) {
    let error = Error::unauthorized(message);
    assert_eq!(error.message(), "unauthorised");
}

#[rstest]
fn display_uses_message() {
    let error = Error::invalid_request("token required");
    assert_eq!(error.to_string(), "token required");
}

#[rstest]
fn no_trace_id_outside_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn captures_scoped_trace_id(trace_id: TraceId) {
    let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn with_trace_id_overrides_capture() {
    let error = Error::internal("boom").with_trace_id("abc");
    assert_eq!(error.trace_id(), Some("abc"));
}

#[rstest]
fn error_code_serialises_as_snake_case() {
    let value = serde_json::to_value(ErrorCode::ServiceUnavailable).expect("serialises");
    assert_eq!(value, serde_json::json!("service_unavailable"));
}

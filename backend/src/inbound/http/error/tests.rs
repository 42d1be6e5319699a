//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("token required"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("Invalid token"), StatusCode::UNAUTHORIZED)]
#[case(Error::service_unavailable("store down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn read_error_body(response: HttpResponse) -> ErrorBody {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error body deserialises")
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_trace_id(expected_trace_id: String) {
    let error = Error::unauthorized("Invalid token").with_trace_id(expected_trace_id.clone());
    let response = ResponseError::error_response(&error);

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .expect("trace-id header is set by error_response")
        .to_str()
        .expect("trace-id is valid UTF-8");
    assert_eq!(header, expected_trace_id);
    assert_eq!(
        response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok()),
        Some(WEBHOOK_CACHE_CONTROL)
    );

    let body = read_error_body(response).await;
    assert_eq!(
        body,
        ErrorBody {
            text: "Invalid token".to_owned(),
            code: ErrorCode::Unauthorized,
            trace_id: Some(expected_trace_id),
        }
    );
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("pool exhausted at 10.0.0.5").with_trace_id(expected_trace_id.clone());
    let body = read_error_body(ResponseError::error_response(&error)).await;

    assert_eq!(body.text, "Internal server error");
    assert_eq!(body.code, ErrorCode::InternalError);
    assert_eq!(body.trace_id, Some(expected_trace_id));
}

#[rstest]
#[actix_web::test]
async fn missing_trace_id_omits_header_and_field() {
    let error = Error::invalid_request("token required");
    let response = ResponseError::error_response(&error);

    assert!(response.headers().get(TRACE_ID_HEADER).is_none());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let value: serde_json::Value = serde_json::from_slice(&bytes).expect("valid JSON");
    assert_eq!(
        value,
        serde_json::json!({"text": "token required", "code": "invalid_request"})
    );
}

#[rstest]
fn actix_errors_become_internal() {
    let actix_error = actix_web::error::ErrorBadGateway("upstream exploded");
    let error = Error::from(actix_error);
    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), "Internal server error");
}

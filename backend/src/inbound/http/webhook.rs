//! Chat webhook handler.
//!
//! ```text
//! POST /
//! {"token":"s3cret","type":"MESSAGE","message":{"argumentText":"Kibana"}}
//! ```
//!
//! Only `POST` is routed; other methods on `/` receive 405 from the resource.

use actix_web::{HttpRequest, HttpResponse, error::JsonPayloadError, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::domain::{ChatEvent, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::webhook_cache_header;
use crate::inbound::http::schemas::{ChatEventSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;

/// Body of every successful webhook response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WebhookReply {
    /// Reply text posted to the chat.
    #[schema(example = "Observability owns Kibana. Seeketh thee room Logging - https://chat.example.com/room/kibana")]
    pub text: String,
}

/// Answer one chat platform event.
#[utoipa::path(
    post,
    path = "/",
    request_body = ChatEventSchema,
    responses(
        (
            status = 200,
            description = "Reply to post in the chat",
            headers(("Cache-Control" = String, description = "Always max-age=1")),
            body = WebhookReply
        ),
        (status = 400, description = "Token missing or body malformed", body = ErrorSchema),
        (status = 401, description = "Token does not match", body = ErrorSchema),
        (status = 405, description = "Only POST is accepted"),
        (status = 503, description = "Directory store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["chat"]
)]
pub async fn handle_chat_event(
    state: web::Data<HttpState>,
    payload: web::Json<ChatEvent>,
) -> ApiResult<HttpResponse> {
    let event = payload.into_inner();
    debug!(event_type = ?event.event_type, "chat event received");

    let text = state.chat_events.handle(event).await?;
    Ok(HttpResponse::Ok()
        .insert_header(webhook_cache_header())
        .json(WebhookReply { text }))
}

fn malformed_event(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "rejected malformed chat event");
    Error::invalid_request(format!("malformed chat event: {err}")).into()
}

/// Register the webhook resource.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .app_data(web::JsonConfig::default().error_handler(malformed_event))
            .route(web::post().to(handle_chat_event)),
    );
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::MockChatEventHandler;
    use crate::domain::{ChatEventType, ErrorCode};
    use crate::inbound::http::error::ErrorBody;
    use actix_web::{App, http::StatusCode, http::header, test};
    use rstest::rstest;

    async fn call(
        handler: MockChatEventHandler,
        req: test::TestRequest,
    ) -> actix_web::dev::ServiceResponse {
        let state = HttpState::new(Arc::new(handler));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;
        test::call_service(&app, req.uri("/").to_request()).await
    }

    #[rstest]
    #[actix_web::test]
    async fn replies_with_handler_text() {
        let mut handler = MockChatEventHandler::new();
        handler
            .expect_handle()
            .withf(|event| {
                event.event_type == ChatEventType::Message && event.argument_text() == "Kibana"
            })
            .times(1)
            .return_once(|_| Ok("Observability owns Kibana.".to_owned()));

        let res = call(
            handler,
            test::TestRequest::post().set_json(serde_json::json!({
                "token": "s3cret",
                "type": "MESSAGE",
                "message": {"argumentText": "Kibana"}
            })),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()
                .get(header::CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
            Some("max-age=1")
        );
        let body: WebhookReply = test::read_body_json(res).await;
        assert_eq!(body.text, "Observability owns Kibana.");
    }

    #[rstest]
    #[case(ErrorCode::InvalidRequest, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::Unauthorized, StatusCode::UNAUTHORIZED)]
    #[case(ErrorCode::ServiceUnavailable, StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_web::test]
    async fn maps_handler_errors(#[case] code: ErrorCode, #[case] status: StatusCode) {
        let mut handler = MockChatEventHandler::new();
        handler
            .expect_handle()
            .return_once(move |_| Err(Error::new(code, "nope")));

        let res = call(
            handler,
            test::TestRequest::post().set_json(serde_json::json!({"type": "MESSAGE"})),
        )
        .await;

        assert_eq!(res.status(), status);
        let body: ErrorBody = test::read_body_json(res).await;
        assert_eq!(body.text, "nope");
        assert_eq!(body.code, code);
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_json_is_bad_request() {
        let mut handler = MockChatEventHandler::new();
        handler.expect_handle().never();

        let res = call(
            handler,
            test::TestRequest::post()
                .insert_header((header::CONTENT_TYPE, "application/json"))
                .set_payload("{\"token\":"),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(res).await;
        assert_eq!(body.code, ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case(test::TestRequest::get())]
    #[case(test::TestRequest::put())]
    #[case(test::TestRequest::delete())]
    #[actix_web::test]
    async fn other_methods_are_not_allowed(#[case] req: test::TestRequest) {
        let mut handler = MockChatEventHandler::new();
        handler.expect_handle().never();

        let res = call(handler, req).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}

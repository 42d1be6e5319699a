//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the webhook and health paths plus the schema wrappers
//! from [`crate::inbound::http::schemas`]. The document backs Swagger UI in
//! debug builds and is printed by `cargo run --bin openapi-dump`.

use crate::inbound::http::schemas::{
    ChatEventSchema, ChatEventTypeSchema, ChatMessageSchema, ErrorCodeSchema, ErrorSchema,
};
use crate::inbound::http::health::{ProbeReport, ProbeStatus};
use crate::inbound::http::webhook::WebhookReply;
use utoipa::OpenApi;

/// OpenAPI document for the HTTP interface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ownerbot API",
        description = "Chat webhook answering who owns which service, plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::webhook::handle_chat_event,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ChatEventSchema,
        ChatEventTypeSchema,
        ChatMessageSchema,
        WebhookReply,
        ErrorSchema,
        ErrorCodeSchema,
        ProbeReport,
        ProbeStatus
    )),
    tags(
        (name = "chat", description = "Chat platform webhook"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their structure for the generated document only.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The body misses the token or is not a chat event.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The token does not match.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The directory store could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::inbound::http::error::ErrorBody`].
#[derive(ToSchema)]
#[schema(as = domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Human-readable message.
    #[schema(example = "Invalid token")]
    text: String,
    /// Stable machine-readable error code.
    #[schema(example = "unauthorized")]
    code: ErrorCodeSchema,
    /// Correlation identifier for tracing this error across systems.
    #[schema(rename = "traceId", example = "7c9e6679-7425-40de-944b-e07fc1f90ae7")]
    trace_id: Option<String>,
}

/// OpenAPI schema for [`crate::domain::ChatEventType`].
#[derive(ToSchema)]
#[schema(as = domain::ChatEventType)]
pub enum ChatEventTypeSchema {
    /// The bot joined a space.
    #[schema(rename = "ADDED_TO_SPACE")]
    AddedToSpace,
    /// The bot left a space.
    #[schema(rename = "REMOVED_FROM_SPACE")]
    RemovedFromSpace,
    /// A user mentioned the bot.
    #[schema(rename = "MESSAGE")]
    Message,
}

/// OpenAPI schema for [`crate::domain::ChatMessage`].
#[derive(ToSchema)]
#[schema(as = domain::ChatMessage)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ChatMessageSchema {
    /// Text after the bot mention.
    #[schema(rename = "argumentText", example = "Kibana")]
    argument_text: Option<String>,
}

/// OpenAPI schema for [`crate::domain::ChatEvent`].
#[derive(ToSchema)]
#[schema(as = domain::ChatEvent)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ChatEventSchema {
    /// Shared webhook token.
    #[schema(example = "s3cret")]
    token: Option<String>,
    /// Event discriminator.
    #[schema(rename = "type")]
    event_type: ChatEventTypeSchema,
    /// Present for `MESSAGE` events.
    message: Option<ChatMessageSchema>,
}

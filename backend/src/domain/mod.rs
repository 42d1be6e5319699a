//! Domain primitives, aggregates and services.
//!
//! Purpose: hold the ownerbot's transport-agnostic behaviour. Adapters talk to
//! the domain through the traits in [`ports`]; nothing here knows about HTTP
//! or Redis.
//!
//! Public surface:
//! - [`ServiceRecord`] and [`DirectoryDocument`]: the persisted directory.
//! - [`ServiceDirectory`]: loading, lookup and validated mutation.
//! - [`Command`] and [`CommandResult`]: chat command dispatch and replies.
//! - [`OwnerBot`]: token check and chat event dispatch.
//! - [`Error`] and [`ErrorCode`]: failures surfaced to inbound adapters.

pub mod chat_event;
pub mod command_parser;
pub mod commands;
pub mod error;
pub mod owner_bot;
pub mod ports;
pub mod service_directory;
pub mod service_record;
pub mod trace_id;

pub use self::chat_event::{ChatEvent, ChatEventType, ChatMessage};
pub use self::command_parser::tokenize;
pub use self::commands::{Command, CommandResult, help_text};
pub use self::error::{Error, ErrorCode};
pub use self::owner_bot::{OwnerBot, failure_reply};
pub use self::service_directory::{
    DirectoryError, DirectoryErrorKind, RequiredField, ServiceDirectory,
};
pub use self::service_record::{DirectoryDocument, INITIAL_VERSION, ServiceRecord, compare_names};
pub use self::trace_id::TraceId;

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";

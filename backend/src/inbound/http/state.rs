//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::ChatEventHandler;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Answers decoded chat events.
    pub chat_events: Arc<dyn ChatEventHandler>,
}

impl HttpState {
    /// Construct state from the chat event port.
    pub fn new(chat_events: Arc<dyn ChatEventHandler>) -> Self {
        Self { chat_events }
    }
}

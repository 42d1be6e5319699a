//! Driving port for inbound chat events.
//!
//! Inbound adapters hand over a decoded [`ChatEvent`] and get back the reply
//! text. Authentication failures and infrastructure faults come back as a
//! domain [`Error`] so each transport can pick its own status mapping.

use async_trait::async_trait;

use crate::domain::{ChatEvent, Error};

/// Handles one chat event end to end.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatEventHandler: Send + Sync {
    /// Authenticate `event` and produce the text the bot answers with.
    ///
    /// # Errors
    ///
    /// Returns an error when:
    /// - the event carries no token ([`crate::domain::ErrorCode::InvalidRequest`]);
    /// - the token does not match ([`crate::domain::ErrorCode::Unauthorized`]);
    /// - the expected token cannot be loaded
    ///   ([`crate::domain::ErrorCode::ServiceUnavailable`]).
    ///
    /// Command failures are not errors: they are part of the reply text.
    async fn handle(&self, event: ChatEvent) -> Result<String, Error>;
}

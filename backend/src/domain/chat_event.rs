//! Chat platform event payloads.
//!
//! ```json
//! {"token":"s3cret","type":"MESSAGE","message":{"argumentText":"Kibana"}}
//! ```

use serde::{Deserialize, Serialize};

/// Kind of event delivered by the chat platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatEventType {
    /// The bot joined a space.
    AddedToSpace,
    /// The bot was removed from a space.
    RemovedFromSpace,
    /// A user mentioned the bot.
    Message,
    /// Any type this bot does not know, or none at all.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Message portion of a [`ChatEvent`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Text following the bot mention.
    #[serde(default)]
    pub argument_text: Option<String>,
}

/// One inbound webhook event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEvent {
    /// Shared secret proving the call comes from the chat platform.
    #[serde(default)]
    pub token: Option<String>,
    /// Event discriminator.
    #[serde(rename = "type", default)]
    pub event_type: ChatEventType,
    /// Present for [`ChatEventType::Message`] events.
    #[serde(default)]
    pub message: Option<ChatMessage>,
}

impl ChatEvent {
    /// Build a `MESSAGE` event carrying `argument_text`.
    ///
    /// # Examples
    /// ```
    /// use ownerbot::domain::{ChatEvent, ChatEventType};
    ///
    /// let event = ChatEvent::message("s3cret", "help");
    /// assert_eq!(event.event_type, ChatEventType::Message);
    /// assert_eq!(event.argument_text(), "help");
    /// ```
    pub fn message(token: impl Into<String>, argument_text: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            event_type: ChatEventType::Message,
            message: Some(ChatMessage {
                argument_text: Some(argument_text.into()),
            }),
        }
    }

    /// Argument text with surrounding whitespace removed; empty when absent.
    #[must_use]
    pub fn argument_text(&self) -> &str {
        self.message
            .as_ref()
            .and_then(|message| message.argument_text.as_deref())
            .unwrap_or_default()
            .trim()
    }
}

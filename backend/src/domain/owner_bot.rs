//! Chat event handling: token check, event dispatch and the failure reply.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{ChatEventHandler, DirectoryStore, DirectoryStoreError, TOKEN_KEY};
use crate::domain::{ChatEvent, ChatEventType, Command, DirectoryError, Error, ServiceDirectory};

/// Reply to `ADDED_TO_SPACE`.
pub const GREETING: &str = "Greetings seeker. I dispense, knowledge and wisdom of services from my codex. Thou mayest query my vast knowledge thus: @ownerbot Kibana";

/// Reply to `REMOVED_FROM_SPACE`.
pub const FAREWELL: &str = "Fare thee well. Remember the virtues.";

/// Reply to event types the bot does not handle.
pub const UNKNOWN_EVENT: &str = "Unknown message type";

/// Chat reply produced when a command fails with a [`DirectoryError`].
#[must_use]
pub fn failure_reply(error: &DirectoryError) -> String {
    format!("Alas, thou hast failed. Considereth thou the following: {error}")
}

/// The bot: authenticates events and answers them from the directory.
///
/// The expected token is the configured one when present, otherwise the
/// value stored under [`TOKEN_KEY`].
pub struct OwnerBot<S: ?Sized> {
    store: Arc<S>,
    token: Option<Zeroizing<String>>,
}

impl<S> OwnerBot<S>
where
    S: DirectoryStore + ?Sized,
{
    /// Bot reading its token from the store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store, token: None }
    }

    /// Use `token` instead of the stored one.
    #[must_use]
    pub fn with_token(mut self, token: Zeroizing<String>) -> Self {
        self.token = Some(token);
        self
    }

    async fn expected_token(&self) -> Result<Option<Zeroizing<String>>, Error> {
        if let Some(token) = &self.token {
            return Ok(Some(token.clone()));
        }
        self.store
            .get(TOKEN_KEY)
            .await
            .map(|stored| stored.map(Zeroizing::new))
            .map_err(|err| {
                warn!(error = %err, "failed to load webhook token");
                map_store_error(&err)
            })
    }

    async fn authenticate(&self, presented: Option<&str>) -> Result<(), Error> {
        let presented = presented.filter(|token| !token.is_empty());
        let Some(presented) = presented else {
            return Err(Error::invalid_request("token required"));
        };

        match self.expected_token().await? {
            Some(expected) if expected.as_str() == presented => Ok(()),
            Some(_) => {
                warn!("rejected event with mismatched token");
                Err(Error::unauthorized("Invalid token"))
            }
            None => {
                warn!("no webhook token configured or stored");
                Err(Error::unauthorized("Invalid token"))
            }
        }
    }

    /// Answer a `MESSAGE` event's argument text.
    ///
    /// Directory failures never escape: they become the "Alas" reply.
    pub async fn on_message(&self, argument_text: &str) -> String {
        match self.run_command(argument_text).await {
            Ok(text) => text,
            Err(error) => {
                warn!(kind = ?error.kind(), error = %error, "command failed");
                failure_reply(&error)
            }
        }
    }

    async fn run_command(&self, argument_text: &str) -> Result<String, DirectoryError> {
        let mut directory = ServiceDirectory::load(Arc::clone(&self.store)).await?;
        let command = Command::parse(argument_text);
        let result = command.respond(&mut directory).await?;
        debug!(success = result.success, "command answered");
        Ok(result.text)
    }
}

#[async_trait]
impl<S> ChatEventHandler for OwnerBot<S>
where
    S: DirectoryStore + ?Sized + 'static,
{
    async fn handle(&self, event: ChatEvent) -> Result<String, Error> {
        self.authenticate(event.token.as_deref()).await?;

        let reply = match event.event_type {
            ChatEventType::AddedToSpace => {
                info!("added to space");
                GREETING.to_owned()
            }
            ChatEventType::RemovedFromSpace => {
                info!("removed from space");
                FAREWELL.to_owned()
            }
            ChatEventType::Message => self.on_message(event.argument_text()).await,
            ChatEventType::Unknown => UNKNOWN_EVENT.to_owned(),
        };
        Ok(reply)
    }
}

fn map_store_error(error: &DirectoryStoreError) -> Error {
    match error {
        DirectoryStoreError::Backend { message } => Error::service_unavailable(message.clone()),
        DirectoryStoreError::Serialization { message } => Error::internal(message.clone()),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockDirectoryStore, SERVICES_KEY};
    use crate::outbound::kv::InMemoryDirectoryStore;
    use crate::test_support::{SAMPLE_TOKEN, sample_document, seeded_store};
    use rstest::{fixture, rstest};

    #[fixture]
    fn bot() -> OwnerBot<InMemoryDirectoryStore> {
        OwnerBot::new(seeded_store())
    }

    fn event(event_type: ChatEventType) -> ChatEvent {
        ChatEvent {
            token: Some(SAMPLE_TOKEN.to_owned()),
            event_type,
            message: None,
        }
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[tokio::test]
    async fn missing_token_is_invalid_request(
        bot: OwnerBot<InMemoryDirectoryStore>,
        #[case] token: Option<&str>,
    ) {
        let event = ChatEvent {
            token: token.map(str::to_owned),
            ..ChatEvent::message("", "help")
        };
        let error = bot.handle(event).await.expect_err("token required");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), "token required");
    }

    #[rstest]
    #[tokio::test]
    async fn wrong_token_is_unauthorized(bot: OwnerBot<InMemoryDirectoryStore>) {
        let error = bot
            .handle(ChatEvent::message("guess", "help"))
            .await
            .expect_err("token rejected");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.message(), "Invalid token");
    }

    #[rstest]
    #[tokio::test]
    async fn no_expected_token_rejects_everything() {
        let bot = OwnerBot::new(Arc::new(InMemoryDirectoryStore::default()));
        let error = bot
            .handle(ChatEvent::message("anything", "help"))
            .await
            .expect_err("token rejected");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn configured_token_takes_precedence(bot: OwnerBot<InMemoryDirectoryStore>) {
        let bot = bot.with_token(Zeroizing::new("configured".to_owned()));

        assert!(bot.handle(ChatEvent::message("configured", "help")).await.is_ok());
        let error = bot
            .handle(ChatEvent::message(SAMPLE_TOKEN, "help"))
            .await
            .expect_err("stored token ignored");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case(DirectoryStoreError::backend("connection refused"), ErrorCode::ServiceUnavailable)]
    #[case(DirectoryStoreError::serialization("bad utf-8"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn token_lookup_failure_maps_to_error(
        #[case] failure: DirectoryStoreError,
        #[case] expected: ErrorCode,
    ) {
        let mut store = MockDirectoryStore::new();
        store
            .expect_get()
            .withf(|key| key.to_string() == TOKEN_KEY)
            .times(1)
            .return_once(move |_| Err(failure));

        let bot = OwnerBot::new(Arc::new(store));
        let error = bot
            .handle(ChatEvent::message("s3cret", "help"))
            .await
            .expect_err("lookup failure surfaces");
        assert_eq!(error.code(), expected);
    }

    #[rstest]
    #[case(ChatEventType::AddedToSpace, GREETING)]
    #[case(ChatEventType::RemovedFromSpace, FAREWELL)]
    #[case(ChatEventType::Unknown, UNKNOWN_EVENT)]
    #[tokio::test]
    async fn lifecycle_events_get_fixed_replies(
        bot: OwnerBot<InMemoryDirectoryStore>,
        #[case] event_type: ChatEventType,
        #[case] expected: &str,
    ) {
        let reply = bot.handle(event(event_type)).await.expect("event handled");
        assert_eq!(reply, expected);
    }

    #[rstest]
    fn greeting_mentions_query_usage() {
        assert!(GREETING.ends_with("@ownerbot Kibana"));
    }

    #[rstest]
    #[tokio::test]
    async fn message_runs_query(bot: OwnerBot<InMemoryDirectoryStore>) {
        let reply = bot
            .handle(ChatEvent::message(SAMPLE_TOKEN, "  logs "))
            .await
            .expect("event handled");
        assert_eq!(
            reply,
            "Observability owns Kibana. Seeketh thee room Logging - https://chat.example.com/room/kibana"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn message_without_text_is_an_empty_query(bot: OwnerBot<InMemoryDirectoryStore>) {
        let reply = bot
            .handle(event(ChatEventType::Message))
            .await
            .expect("event handled");
        assert!(reply.starts_with("I knoweth not of that service."));
    }

    #[rstest]
    #[tokio::test]
    async fn command_failure_becomes_alas_reply(bot: OwnerBot<InMemoryDirectoryStore>) {
        let reply = bot
            .handle(ChatEvent::message(
                SAMPLE_TOKEN,
                "add Kibana Observability Logging https://x logs",
            ))
            .await
            .expect("event handled");
        assert_eq!(
            reply,
            "Alas, thou hast failed. Considereth thou the following: Kibana already exists as a service. Delete it first or use another name"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn corrupt_directory_becomes_alas_reply() {
        let store = InMemoryDirectoryStore::with_entry(SERVICES_KEY, "{\"services\": 42}");
        let bot = OwnerBot::new(Arc::new(store))
            .with_token(Zeroizing::new(SAMPLE_TOKEN.to_owned()));

        let reply = bot
            .handle(ChatEvent::message(SAMPLE_TOKEN, "Kibana"))
            .await
            .expect("event handled");
        assert!(reply.starts_with("Alas, thou hast failed."));
    }

    #[rstest]
    #[tokio::test]
    async fn each_message_reloads_the_directory(bot: OwnerBot<InMemoryDirectoryStore>) {
        bot.handle(ChatEvent::message(SAMPLE_TOKEN, "delete Kibana"))
            .await
            .expect("delete handled");

        let reply = bot
            .handle(ChatEvent::message(SAMPLE_TOKEN, "export"))
            .await
            .expect("export handled");
        let exported = crate::domain::DirectoryDocument::from_json(&reply).expect("export parses");
        assert_eq!(exported.version, sample_document().version + 1);
        assert_eq!(exported.services.len(), 3);
    }
}

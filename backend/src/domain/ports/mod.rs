//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod chat_event_handler;
mod directory_store;

#[cfg(test)]
pub use chat_event_handler::MockChatEventHandler;
pub use chat_event_handler::ChatEventHandler;
#[cfg(test)]
pub use directory_store::MockDirectoryStore;
pub use directory_store::{DirectoryStore, DirectoryStoreError, SERVICES_KEY, TOKEN_KEY};

//! Driven port for the key-value store holding the service directory.
//!
//! The store only offers atomic single-key reads and writes. The directory
//! lives under [`SERVICES_KEY`] as one JSON document; the webhook token, when
//! not configured explicitly, lives under [`TOKEN_KEY`].

use async_trait::async_trait;

use super::define_port_error;

/// Key of the directory document.
pub const SERVICES_KEY: &str = "services";

/// Key of the shared webhook token.
pub const TOKEN_KEY: &str = "token";

define_port_error! {
    /// Errors surfaced by directory store adapters.
    pub enum DirectoryStoreError {
        /// Store backend is unavailable or rejected the operation.
        Backend { message: String } => "directory store backend failure: {message}",
        /// A value could not be encoded or decoded.
        Serialization { message: String } => "directory store serialisation failed: {message}",
    }
}

/// Async key-value access used by the service directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Read the raw value stored under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>, DirectoryStoreError>;

    /// Overwrite the value stored under `key`.
    async fn put(&self, key: &str, value: &str) -> Result<(), DirectoryStoreError>;
}

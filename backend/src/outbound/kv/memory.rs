//! Process-local directory store.
//!
//! Used when no Redis URL is configured and throughout the test suites. Values
//! vanish when the process exits.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{DirectoryStore, DirectoryStoreError};

/// [`DirectoryStore`] backed by a `HashMap` behind a lock.
#[derive(Debug, Default)]
pub struct InMemoryDirectoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryDirectoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a single entry.
    ///
    /// # Examples
    /// ```
    /// use ownerbot::outbound::kv::InMemoryDirectoryStore;
    ///
    /// let store = InMemoryDirectoryStore::with_entry("token", "s3cret");
    /// assert_eq!(store.len(), 1);
    /// ```
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_entries([(key.into(), value.into())])
    }

    /// Create a store holding every `(key, value)` pair.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect::<HashMap<_, _>>();
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Number of stored keys. A poisoned lock counts as empty.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or_default()
    }

    /// True when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> DirectoryStoreError {
    DirectoryStoreError::backend("in-memory store lock poisoned")
}

#[async_trait]
impl DirectoryStore for InMemoryDirectoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DirectoryStoreError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), DirectoryStoreError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

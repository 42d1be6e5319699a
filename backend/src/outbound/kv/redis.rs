//! Redis-backed directory store.
//!
//! Keys are used verbatim (`services`, `token`) so a deployment can share the
//! keyspace with other tooling that inspects the directory. Connections come
//! from a `bb8` pool; checkout and command failures surface as
//! [`DirectoryStoreError::Backend`], reply decoding failures as
//! [`DirectoryStoreError::Serialization`].

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, RunError};
use bb8_redis::redis::{AsyncCommands, ErrorKind, RedisError};
use tracing::{debug, warn};

use crate::domain::ports::{DirectoryStore, DirectoryStoreError};

/// Pool settings for [`RedisDirectoryStore`].
#[derive(Debug, Clone)]
pub struct RedisStoreConfig {
    url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl RedisStoreConfig {
    /// Configuration for `url` with a pool of 8 and a 5 second checkout
    /// timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_size: 8,
            connection_timeout: Duration::from_secs(5),
        }
    }

    /// Set the maximum number of pooled connections.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the connection checkout timeout.
    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}

/// [`DirectoryStore`] talking to Redis with plain `GET`/`SET`.
#[derive(Clone)]
pub struct RedisDirectoryStore {
    pool: Pool<RedisConnectionManager>,
}

impl RedisDirectoryStore {
    /// Build the connection pool. No connection is opened until first use.
    ///
    /// # Errors
    /// Returns [`DirectoryStoreError::Backend`] when the URL is not a valid
    /// Redis connection string.
    pub async fn connect(config: RedisStoreConfig) -> Result<Self, DirectoryStoreError> {
        let manager = RedisConnectionManager::new(config.url.as_str())
            .map_err(|err| DirectoryStoreError::backend(format!("invalid redis url: {err}")))?;
        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(map_redis_error)?;
        Ok(Self { pool })
    }
}

fn map_redis_error(err: RedisError) -> DirectoryStoreError {
    if err.kind() == ErrorKind::UnexpectedReturnType {
        DirectoryStoreError::serialization(err.to_string())
    } else {
        DirectoryStoreError::backend(err.to_string())
    }
}

fn map_checkout_error(err: RunError<RedisError>) -> DirectoryStoreError {
    warn!(error = %err, "redis connection checkout failed");
    match err {
        RunError::User(inner) => map_redis_error(inner),
        RunError::TimedOut => DirectoryStoreError::backend("timed out waiting for redis connection"),
    }
}

#[async_trait]
impl DirectoryStore for RedisDirectoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DirectoryStoreError> {
        let mut conn = self.pool.get().await.map_err(map_checkout_error)?;
        let value: Option<String> = conn.get(key).await.map_err(map_redis_error)?;
        debug!(key, hit = value.is_some(), "redis GET");
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), DirectoryStoreError> {
        let mut conn = self.pool.get().await.map_err(map_checkout_error)?;
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(map_redis_error)?;
        debug!(key, bytes = value.len(), "redis SET");
        Ok(())
    }
}

//! Key-value adapters for the [`DirectoryStore`](crate::domain::ports::DirectoryStore) port.

mod memory;
mod redis;

pub use memory::InMemoryDirectoryStore;
pub use redis::{RedisDirectoryStore, RedisStoreConfig};

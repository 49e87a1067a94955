//! Key-value store adapters.
//!
//! The cache never talks to a store client directly. Everything goes through
//! [`KeyValueStore`], which exposes the handful of primitives the cache and its
//! instrumentation need: byte get/set, atomic increment, list append/range and
//! a destructive flush.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{StorageConfig, StorageType};

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use memory::MemoryStore;
#[cfg(feature = "redis")]
pub use self::redis::RedisStore;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[cfg(feature = "redis")]
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Operation against a key holding the wrong kind of value: {key}")]
    WrongType { key: String },

    #[error("Value is not an integer or out of range: {key}")]
    NotAnInteger { key: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown storage backend: {0}")]
    UnknownBackend(String),
}

/// Interface to an external key-value store.
///
/// Semantics follow Redis:
/// - `get` on a missing key returns `None`
/// - `incr` treats a missing key as `0` and fails on non-integer values
/// - `rpush` creates the list on first append
/// - `lrange` accepts negative indices counted from the tail (`0, -1` is the
///   whole list) and returns an empty list for a missing key
///
/// # Implementations
///
/// - `RedisStore`: Redis over a multiplexed connection
/// - `MemoryStore`: in-process store for tests and local runs
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Atomically increment the integer under `key` by one.
    ///
    /// Returns the value after the increment.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Append `value` to the tail of the list under `key`.
    ///
    /// Returns the length of the list after the append.
    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize>;

    /// Read the elements of the list under `key` between `start` and `stop`,
    /// both inclusive.
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>>;

    /// Remove every key from the store.
    async fn flush(&self) -> Result<()>;
}

/// Open the store selected by configuration.
pub async fn init_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    match config.storage_type {
        StorageType::Memory => {
            info!("Storage: in-memory");
            Ok(Arc::new(MemoryStore::new()))
        }
        #[cfg(feature = "redis")]
        StorageType::Redis => {
            info!("Storage: redis at {}", config.redis.url);
            Ok(Arc::new(RedisStore::new(&config.redis.url).await?))
        }
        #[cfg(not(feature = "redis"))]
        StorageType::Redis => {
            tracing::error!("Redis storage requested but 'redis' feature is not enabled");
            Err(StoreError::UnknownBackend("redis".to_string()))
        }
    }
}

//! In-memory KeyValueStore implementation.
//!
//! Mirrors the Redis semantics the cache relies on, including wrong-type
//! errors and integer validation on `incr`. Failure toggles let tests inject
//! store errors at specific points.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeyValueStore, Result, StoreError};

enum Entry {
    Bytes(Vec<u8>),
    List(Vec<Vec<u8>>),
}

/// In-process key-value store.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
    fail_on_set: RwLock<bool>,
    fail_on_rpush: RwLock<bool>,
    fail_on_read: RwLock<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `set` fail until cleared.
    pub async fn set_fail_on_set(&self, fail: bool) {
        *self.fail_on_set.write().await = fail;
    }

    /// Make `rpush` fail until cleared.
    pub async fn set_fail_on_rpush(&self, fail: bool) {
        *self.fail_on_rpush.write().await = fail;
    }

    /// Make `get` and `lrange` fail until cleared.
    pub async fn set_fail_on_read(&self, fail: bool) {
        *self.fail_on_read.write().await = fail;
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn check(&self, toggle: &RwLock<bool>, operation: &str) -> Result<()> {
        if *toggle.read().await {
            return Err(StoreError::Unavailable(format!(
                "{} failed (injected)",
                operation
            )));
        }
        Ok(())
    }
}

/// Resolve a Redis-style inclusive range against a list of `len` elements.
fn resolve_range(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start >= len || stop < 0 || start > stop {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.check(&self.fail_on_read, "get").await?;

        match self.entries.read().await.get(key) {
            None => Ok(None),
            Some(Entry::Bytes(value)) => Ok(Some(value.clone())),
            Some(Entry::List(_)) => Err(StoreError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.check(&self.fail_on_set, "set").await?;

        self.entries
            .write()
            .await
            .insert(key.to_string(), Entry::Bytes(value.to_vec()));
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut entries = self.entries.write().await;

        let current = match entries.get(key) {
            None => 0,
            Some(Entry::Bytes(value)) => std::str::from_utf8(value)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| StoreError::NotAnInteger {
                    key: key.to_string(),
                })?,
            Some(Entry::List(_)) => {
                return Err(StoreError::WrongType {
                    key: key.to_string(),
                })
            }
        };

        let next = current
            .checked_add(1)
            .ok_or_else(|| StoreError::NotAnInteger {
                key: key.to_string(),
            })?;
        entries.insert(key.to_string(), Entry::Bytes(next.to_string().into_bytes()));
        Ok(next)
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize> {
        self.check(&self.fail_on_rpush, "rpush").await?;

        let mut entries = self.entries.write().await;
        match entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::List(Vec::new()))
        {
            Entry::List(items) => {
                items.push(value.to_vec());
                Ok(items.len())
            }
            Entry::Bytes(_) => Err(StoreError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        self.check(&self.fail_on_read, "lrange").await?;

        match self.entries.read().await.get(key) {
            None => Ok(Vec::new()),
            Some(Entry::List(items)) => Ok(resolve_range(items.len(), start, stop)
                .map(|(from, to)| items[from..=to].to_vec())
                .unwrap_or_default()),
            Some(Entry::Bytes(_)) => Err(StoreError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    async fn flush(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

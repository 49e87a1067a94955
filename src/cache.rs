//! Cache facade.
//!
//! [`Cache`] stores values under generated keys and reads them back, with
//! optional decoding. Every `store` call is counted and recorded in call
//! history so it can be replayed later (see [`crate::replay`]).

use std::num::ParseIntError;
use std::string::FromUtf8Error;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::advice::{Counted, Operation, Record, Recorded};
use crate::config::StorageConfig;
use crate::replay;
use crate::store::{self, KeyValueStore, StoreError};
use crate::value::Value;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Value is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    #[error("Value is not an integer: {0}")]
    ParseInt(#[from] ParseIntError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Argument tuple of a `store` call.
///
/// Recorded in history as a one-element tuple literal, e.g. `('hello',)`.
pub struct StoreArgs(pub Value);

impl Record for StoreArgs {
    fn record(&self) -> Vec<u8> {
        format!("({},)", self.0.literal()).into_bytes()
    }
}

/// Raw store operation: writes a value under a fresh UUID key.
pub struct StoreValue {
    store: Arc<dyn KeyValueStore>,
}

impl StoreValue {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Operation for StoreValue {
    type Input = StoreArgs;
    type Output = String;
    type Error = CacheError;

    fn name(&self) -> &str {
        Cache::STORE_OPERATION
    }

    async fn call(&self, input: StoreArgs) -> Result<String> {
        let key = Uuid::new_v4().to_string();
        self.store.set(&key, &input.0.encode()).await?;

        debug!(key = %key, "Stored value");

        Ok(key)
    }
}

/// Value cache backed by a key-value store.
///
/// Construction flushes the store. Use only against a store dedicated to the
/// cache.
pub struct Cache {
    store: Arc<dyn KeyValueStore>,
    store_op: Recorded<Counted<StoreValue>>,
}

impl Cache {
    /// Fully-qualified name of the `store` operation.
    ///
    /// Key of its call counter and prefix of its history lists.
    pub const STORE_OPERATION: &'static str = "Cache.store";

    /// Create a cache over `store`, removing everything already in it.
    pub async fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        store.flush().await?;
        info!("Cache initialized, store flushed");

        let store_op = Recorded::new(
            Counted::new(StoreValue::new(store.clone()), Some(store.clone())),
            Some(store.clone()),
        );

        Ok(Self { store, store_op })
    }

    /// Open the configured store and create a cache over it.
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        let store = store::init_store(config).await?;
        Self::new(store).await
    }

    /// Handle to the underlying store.
    pub fn store_handle(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Store `value` under a newly generated key and return the key.
    pub async fn store(&self, value: impl Into<Value>) -> Result<String> {
        self.store_op.call(StoreArgs(value.into())).await
    }

    /// Read the raw bytes stored under `key`.
    ///
    /// Returns `None` when the key does not exist. An empty stored value is
    /// `Some(vec![])`.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.store.get(key).await?)
    }

    /// Read the value under `key` and decode it with `decode`.
    ///
    /// `decode` is not called when the key does not exist.
    pub async fn get_with<T, E, F>(&self, key: &str, decode: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> std::result::Result<T, E>,
        E: Into<CacheError>,
    {
        match self.get(key).await? {
            Some(bytes) => decode(bytes).map(Some).map_err(Into::into),
            None => Ok(None),
        }
    }

    /// Read the value under `key` as UTF-8 text.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, String::from_utf8).await
    }

    /// Read the value under `key` as a base-10 integer.
    ///
    /// Surrounding whitespace is ignored, and single underscores may separate
    /// digits (`1_000`).
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, decode_int).await
    }

    /// Print the call history of [`Cache::store`] to stdout.
    pub async fn replay_store(&self) -> Result<()> {
        replay::replay(Some(self.store.as_ref()), Self::STORE_OPERATION).await
    }
}

fn decode_int(bytes: Vec<u8>) -> Result<i64> {
    let text = String::from_utf8(bytes)?;
    let text = text.trim();
    match strip_digit_separators(text) {
        Some(digits) => Ok(digits.parse()?),
        None => Ok(text.parse()?),
    }
}

/// Remove `_` separators from `text` when every one sits between two digits.
///
/// Returns `None` when there is nothing to strip or a separator is misplaced;
/// the caller then parses `text` unchanged and reports the invalid digit.
fn strip_digit_separators(text: &str) -> Option<String> {
    if !text.contains('_') {
        return None;
    }
    let unsigned = text
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(text);
    let well_formed = unsigned
        .split('_')
        .all(|group| !group.is_empty() && group.bytes().all(|b| b.is_ascii_digit()));
    well_formed.then(|| text.replace('_', ""))
}

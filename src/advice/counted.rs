//! Call counting advice.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::Operation;
use crate::store::{KeyValueStore, StoreError};

/// Wrapper that counts invocations of an operation.
///
/// Before each call, increments the integer stored under the operation's name.
/// The increment happens whether or not the call then succeeds.
pub struct Counted<T> {
    inner: T,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl<T> Counted<T> {
    /// Wrap an operation with call counting.
    ///
    /// # Arguments
    /// * `inner` - The operation to wrap
    /// * `store` - Where the counter lives; `None` disables counting
    pub fn new(inner: T, store: Option<Arc<dyn KeyValueStore>>) -> Self {
        Self { inner, store }
    }

    /// Get a reference to the inner operation.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Consume the wrapper and return the inner operation.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[async_trait]
impl<T> Operation for Counted<T>
where
    T: Operation,
    T::Error: From<StoreError>,
{
    type Input = T::Input;
    type Output = T::Output;
    type Error = T::Error;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn call(&self, input: T::Input) -> Result<T::Output, T::Error> {
        if let Some(store) = &self.store {
            let count = store.incr(self.inner.name()).await?;
            debug!(operation = %self.inner.name(), count, "Counted call");
        }

        self.inner.call(input).await
    }
}

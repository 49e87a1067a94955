//! Call history advice.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{Operation, Record};
use crate::store::{KeyValueStore, StoreError};

/// History list holding the recorded inputs of `operation`.
pub fn inputs_key(operation: &str) -> String {
    format!("{}:inputs", operation)
}

/// History list holding the recorded outputs of `operation`.
pub fn outputs_key(operation: &str) -> String {
    format!("{}:outputs", operation)
}

/// Wrapper that records the inputs and outputs of an operation.
///
/// The input is appended to `<name>:inputs` before the call and the output to
/// `<name>:outputs` after it returns. The two appends are separate store
/// commands: if the call fails, or the process dies in between, the lists end
/// up with different lengths. Nothing reconciles them.
pub struct Recorded<T> {
    inner: T,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl<T> Recorded<T> {
    /// Wrap an operation with history recording.
    ///
    /// # Arguments
    /// * `inner` - The operation to wrap
    /// * `store` - Where the history lists live; `None` disables recording
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
impl<T> Operation for Recorded<T>
where
    T: Operation,
    T::Input: Record,
    T::Output: Record,
    T::Error: From<StoreError>,
{
    type Input = T::Input;
    type Output = T::Output;
    type Error = T::Error;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn call(&self, input: T::Input) -> Result<T::Output, T::Error> {
        let name = self.inner.name();

        if let Some(store) = &self.store {
            let len = store.rpush(&inputs_key(name), &input.record()).await?;
            debug!(operation = %name, len, "Recorded call input");
        }

        let output = self.inner.call(input).await?;

        if let Some(store) = &self.store {
            let len = store.rpush(&outputs_key(name), &output.record()).await?;
            debug!(operation = %name, len, "Recorded call output");
        }

        Ok(output)
    }
}

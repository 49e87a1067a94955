//! Aspect-oriented advice for cross-cutting concerns.
//!
//! This module provides wrapper types that add bookkeeping around an
//! [`Operation`] without touching the operation itself.
//!
//! # Architecture
//!
//! Advice is applied at composition time:
//!
//! ```ignore
//! // Core operation - writes a value, nothing else
//! let op = StoreValue::new(store.clone());
//!
//! // Apply advice layers, history outermost
//! let op = Recorded::new(Counted::new(op, Some(store.clone())), Some(store));
//!
//! // Use as normal - bookkeeping is transparent
//! let key = op.call(value).await?;
//! ```
//!
//! Every wrapper takes an optional store handle. Without one the wrapper calls
//! straight through and records nothing.
//!
//! # Available Advice
//!
//! - [`Counted`] - Increments a counter named after the operation
//! - [`Recorded`] - Appends inputs and outputs to history lists

mod counted;
mod recorded;

pub use counted::Counted;
pub use recorded::{inputs_key, outputs_key, Recorded};

use async_trait::async_trait;

/// A named asynchronous operation that advice can wrap.
#[async_trait]
pub trait Operation: Send + Sync {
    type Input: Send + 'static;
    type Output: Send + 'static;
    type Error: Send + 'static;

    /// Fully-qualified operation name, e.g. `Cache.store`.
    ///
    /// Used verbatim as the counter key and as the prefix of history keys.
    fn name(&self) -> &str;

    async fn call(&self, input: Self::Input) -> Result<Self::Output, Self::Error>;
}

/// Byte form of a value as written to call history.
pub trait Record {
    fn record(&self) -> Vec<u8>;
}

impl Record for String {
    fn record(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

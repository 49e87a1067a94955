//! Recall - instrumented value cache
//!
//! Stores values in a key-value store (Redis) under generated keys, counts
//! every `store` call and records its inputs and outputs so the call history
//! can be replayed.

pub mod advice;
pub mod cache;
pub mod config;
pub mod replay;
pub mod store;
pub mod utils;
pub mod value;

pub use cache::{Cache, CacheError};
pub use value::Value;

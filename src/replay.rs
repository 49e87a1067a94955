//! Call history replay.
//!
//! Reads back the counter and history lists written by [`crate::advice`] for
//! one operation and renders them:
//!
//! ```text
//! Cache.store was called 2 times:
//! Cache.store(*('a',)) -> 0f9e8a4c-...
//! Cache.store(*('b',)) -> 5d1b2f7e-...
//! ```

use std::fmt;
use std::io::Write;

use crate::advice::{inputs_key, outputs_key};
use crate::cache::Result;
use crate::store::KeyValueStore;

/// Call history of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    /// Fully-qualified operation name.
    pub operation: String,
    /// Value of the call counter, `0` when never incremented.
    pub count: i64,
    /// Recorded (input, output) pairs in call order.
    pub calls: Vec<(String, String)>,
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} was called {} times:", self.operation, self.count)?;
        for (input, output) in &self.calls {
            writeln!(f, "{}(*{}) -> {}", self.operation, input, output)?;
        }
        Ok(())
    }
}

/// Load the call history of `operation`.
///
/// Returns `None` when there is no store to read from. Inputs and outputs are
/// paired by position; when one list is longer, its extra entries are dropped.
pub async fn load(store: Option<&dyn KeyValueStore>, operation: &str) -> Result<Option<Replay>> {
    let Some(store) = store else {
        return Ok(None);
    };

    let count = match store.get(operation).await? {
        Some(bytes) => String::from_utf8(bytes)?.trim().parse()?,
        None => 0,
    };

    let inputs = store.lrange(&inputs_key(operation), 0, -1).await?;
    let outputs = store.lrange(&outputs_key(operation), 0, -1).await?;

    let calls = inputs
        .iter()
        .zip(outputs.iter())
        .map(|(input, output)| {
            (
                String::from_utf8_lossy(input).into_owned(),
                String::from_utf8_lossy(output).into_owned(),
            )
        })
        .collect();

    Ok(Some(Replay {
        operation: operation.to_string(),
        count,
        calls,
    }))
}

/// Write the call history of `operation` to `out`.
///
/// Writes nothing when there is no store.
pub async fn replay_to<W: Write>(
    store: Option<&dyn KeyValueStore>,
    operation: &str,
    out: &mut W,
) -> Result<()> {
    if let Some(replay) = load(store, operation).await? {
        write!(out, "{}", replay)?;
    }
    Ok(())
}

/// Print the call history of `operation` to stdout.
pub async fn replay(store: Option<&dyn KeyValueStore>, operation: &str) -> Result<()> {
    if let Some(replay) = load(store, operation).await? {
        print!("{}", replay);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Cache, CacheError};
    use crate::store::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_load_without_store_is_none() {
        let replay = load(None, Cache::STORE_OPERATION).await.unwrap();
        assert!(replay.is_none());

        let mut out: Vec<u8> = Vec::new();
        replay_to(None, Cache::STORE_OPERATION, &mut out)
            .await
            .unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_load_never_called() {
        let store = MemoryStore::new();

        let replay = load(Some(&store), "Nothing.here").await.unwrap().unwrap();
        assert_eq!(replay.count, 0);
        assert!(replay.calls.is_empty());
        assert_eq!(replay.to_string(), "Nothing.here was called 0 times:\n");
    }

    #[tokio::test]
    async fn test_replay_three_stores() {
        let store = Arc::new(MemoryStore::new());
        let cache = Cache::new(store.clone()).await.unwrap();

        let a = cache.store("a").await.unwrap();
        let b = cache.store("b").await.unwrap();
        let c = cache.store("c").await.unwrap();

        let mut out: Vec<u8> = Vec::new();
        replay_to(
            Some(cache.store_handle().as_ref()),
            Cache::STORE_OPERATION,
            &mut out,
        )
        .await
        .unwrap();

        let expected = format!(
            "Cache.store was called 3 times:\n\
             Cache.store(*('a',)) -> {}\n\
             Cache.store(*('b',)) -> {}\n\
             Cache.store(*('c',)) -> {}\n",
            a, b, c
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[tokio::test]
    async fn test_mismatched_lists_are_truncated() {
        let store = MemoryStore::new();
        store.set("Op.run", b"3").await.unwrap();
        store.rpush("Op.run:inputs", b"(1,)").await.unwrap();
        store.rpush("Op.run:inputs", b"(2,)").await.unwrap();
        store.rpush("Op.run:inputs", b"(3,)").await.unwrap();
        store.rpush("Op.run:outputs", b"one").await.unwrap();
        store.rpush("Op.run:outputs", b"two").await.unwrap();

        let replay = load(Some(&store), "Op.run").await.unwrap().unwrap();
        assert_eq!(replay.count, 3);
        assert_eq!(
            replay.calls,
            vec![
                ("(1,)".to_string(), "one".to_string()),
                ("(2,)".to_string(), "two".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_load_rejects_non_integer_counter() {
        let store = MemoryStore::new();
        store.set("Op.run", b"many").await.unwrap();

        let result = load(Some(&store), "Op.run").await;
        assert!(matches!(result, Err(CacheError::ParseInt(_))));
    }

    #[tokio::test]
    async fn test_load_propagates_store_errors() {
        let store = MemoryStore::new();
        store.set_fail_on_read(true).await;

        let result = load(Some(&store), "Op.run").await;
        assert!(matches!(result, Err(CacheError::Store(_))));
    }
}

//! recall-demo: store values and replay the call history
//!
//! Stores each command-line argument in the cache, reads it back, then prints
//! the replay of `Cache.store`. Arguments that parse as integers are stored as
//! integers, everything else as text.
//!
//! ## Configuration
//! - RECALL_CONFIG: Path to a YAML config file (optional)
//! - RECALL_STORAGE__TYPE: `redis` (default) or `memory`
//! - RECALL_REDIS_URL: Redis URL (default: redis://localhost:6379)
//! - RECALL_LOG: Log filter (default: info)
//!
//! The configured store is flushed on startup.

use tracing::info;

use recall::config::Config;
use recall::utils::bootstrap::init_tracing;
use recall::{Cache, Value};

fn parse_arg(arg: String) -> Value {
    match arg.parse::<i64>() {
        Ok(i) => Value::Int(i),
        Err(_) => Value::Str(arg),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::load(None)?;
    let cache = Cache::connect(&config.storage).await?;

    info!(storage = ?config.storage.storage_type, "recall-demo started");

    for arg in std::env::args().skip(1) {
        let key = cache.store(parse_arg(arg)).await?;
        let text = cache.get_str(&key).await?.unwrap_or_default();
        println!("{} = {}", key, text);
    }

    cache.replay_store().await?;

    Ok(())
}

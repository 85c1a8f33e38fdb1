pub mod mongo;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{EndpointCount, LogEntry};

/**
 * Read-only queries over logged endpoint calls.
 *
 * Grouping always uses the full (action, url, method, timestamp) key, so two calls
 * are only counted together when their timestamps match exactly.
 */
#[async_trait]
pub trait LogStore: Send + Sync {
    /// The entry with the greatest timestamp, or `None` when nothing is logged.
    async fn last_entry(&self) -> Result<Option<LogEntry>>;

    /// The group with the highest count, or `None` when nothing is logged.
    async fn most_frequent(&self) -> Result<Option<EndpointCount>>;

    /// Every group, highest count first.
    async fn counts(&self) -> Result<Vec<EndpointCount>>;

    /// Release the underlying connection. Called once when the server stops.
    async fn shutdown(&self) {}
}

//! Repository abstractions for the persisted tables.
//!
//! Both tables follow the same whole-table protocol: load everything, mutate
//! in memory, write everything back. A store implementation must only replace
//! the previous content once the new content is fully materialised.
//!
//! Implementations live in `infrastructure::persistence`:
//! - `CsvStore`: semicolon-delimited file on disk
//! - `InMemoryStore`: process-local, nothing survives a restart

use crate::domain::errors::StoreError;
use async_trait::async_trait;

/// Fixed column layout of a persisted table
pub trait TableSchema {
    /// Short name used in logs
    const TABLE: &'static str;
    const HEADER: &'static [&'static str];
}

#[async_trait]
pub trait RecordStore<R: Send + Sync>: Send + Sync {
    /// Load every row, creating an empty table on first use
    async fn load(&self) -> Result<Vec<R>, StoreError>;

    /// Replace the table content with `rows`
    async fn save(&self, rows: &[R]) -> Result<(), StoreError>;
}

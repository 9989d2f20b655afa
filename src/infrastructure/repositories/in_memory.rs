//! In-Memory Store Implementation
//!
//! Process-local implementation of `RecordStore`, used when CSV persistence is
//! switched off and throughout the tests.
//!
//! # Limitations
//!
//! - Data is lost on application restart
//! - Every `load` clones the whole table

use crate::domain::errors::StoreError;
use crate::domain::repositories::RecordStore;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct InMemoryStore<R> {
    rows: Arc<RwLock<Vec<R>>>,
}

impl<R> InMemoryStore<R> {
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    pub fn with_rows(rows: Vec<R>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl<R> Default for InMemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R> RecordStore<R> for InMemoryStore<R>
where
    R: Clone + Send + Sync,
{
    async fn load(&self) -> Result<Vec<R>, StoreError> {
        Ok(self.rows.read().await.clone())
    }

    async fn save(&self, rows: &[R]) -> Result<(), StoreError> {
        *self.rows.write().await = rows.to_vec();
        Ok(())
    }
}

//! Scripted adapters for the ports, used by tests and offline runs.

use crate::domain::errors::{FetchError, StoreError};
use crate::domain::news::FeedEntry;
use crate::domain::ports::{NewsFeed, QuoteProvider, QuoteResponse, SentimentScorer};
use crate::domain::repositories::RecordStore;
use crate::domain::summary::DailyBar;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

/// Feed returning fixed entries per symbol. Unknown symbols yield no entries.
#[derive(Clone, Default)]
pub struct MockNewsFeed {
    entries: Arc<RwLock<HashMap<String, Vec<FeedEntry>>>>,
    failing: Arc<RwLock<Vec<String>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockNewsFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_entries(&self, symbol: &str, entries: Vec<FeedEntry>) {
        self.entries
            .write()
            .await
            .insert(symbol.to_string(), entries);
    }

    pub async fn fail_for(&self, symbol: &str) {
        self.failing.write().await.push(symbol.to_string());
    }

    /// Symbols requested so far, in order
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl NewsFeed for MockNewsFeed {
    async fn fetch_entries(&self, symbol: &str) -> Result<Vec<FeedEntry>, FetchError> {
        self.calls.write().await.push(symbol.to_string());

        if self.failing.read().await.iter().any(|s| s == symbol) {
            return Err(FetchError::Feed {
                symbol: symbol.to_string(),
                reason: "connection refused".to_string(),
            });
        }

        Ok(self
            .entries
            .read()
            .await
            .get(symbol)
            .cloned()
            .unwrap_or_default())
    }
}

/// Quote provider answering from a table keyed by (symbol, day).
///
/// Requests without a scripted answer receive a malformed response.
#[derive(Clone, Default)]
pub struct MockQuoteProvider {
    bars: Arc<RwLock<HashMap<(String, NaiveDate), DailyBar>>>,
    failing: Arc<RwLock<Vec<String>>>,
    requests: Arc<RwLock<Vec<(String, NaiveDate)>>>,
}

impl MockQuoteProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_bar(&self, symbol: &str, day: NaiveDate, bar: DailyBar) {
        self.bars
            .write()
            .await
            .insert((symbol.to_string(), day), bar);
    }

    /// Every request for `symbol` fails at the transport level.
    pub async fn fail_for(&self, symbol: &str) {
        self.failing.write().await.push(symbol.to_string());
    }

    pub async fn requests(&self) -> Vec<(String, NaiveDate)> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl QuoteProvider for MockQuoteProvider {
    async fn daily_bar(&self, symbol: &str, day: NaiveDate) -> Result<QuoteResponse, FetchError> {
        self.requests.write().await.push((symbol.to_string(), day));

        if self.failing.read().await.iter().any(|s| s == symbol) {
            return Err(FetchError::Quote {
                symbol: symbol.to_string(),
                day,
                reason: "HTTP 503 Service Unavailable".to_string(),
            });
        }

        Ok(match self.bars.read().await.get(&(symbol.to_string(), day)) {
            Some(bar) => QuoteResponse::Found(*bar),
            None => QuoteResponse::Malformed(format!("history has no entry for {}", day)),
        })
    }
}

/// Scorer with fixed scores per exact text; anything else scores 0.0.
#[derive(Default)]
pub struct MockSentimentScorer {
    scores: HashMap<String, f64>,
    calls: Mutex<usize>,
}

impl MockSentimentScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(mut self, text: &str, score: f64) -> Self {
        self.scores.insert(text.to_string(), score);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| *calls).unwrap_or_default()
    }
}

impl SentimentScorer for MockSentimentScorer {
    fn score(&self, text: &str) -> f64 {
        if let Ok(mut calls) = self.calls.lock() {
            *calls += 1;
        }
        self.scores.get(text).copied().unwrap_or(0.0)
    }
}

/// Store whose writes always fail; reads return the seeded rows.
pub struct ReadOnlyStore<R> {
    rows: Vec<R>,
}

impl<R> ReadOnlyStore<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl<R> RecordStore<R> for ReadOnlyStore<R>
where
    R: Clone + Send + Sync,
{
    async fn load(&self) -> Result<Vec<R>, StoreError> {
        Ok(self.rows.clone())
    }

    async fn save(&self, _rows: &[R]) -> Result<(), StoreError> {
        Err(StoreError::Io {
            path: "read-only".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only store"),
        })
    }
}

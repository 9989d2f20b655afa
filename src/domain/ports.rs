use crate::domain::errors::FetchError;
use crate::domain::news::FeedEntry;
use crate::domain::summary::DailyBar;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Source of headlines for a ticker symbol
#[async_trait]
pub trait NewsFeed: Send + Sync {
    async fn fetch_entries(&self, symbol: &str) -> Result<Vec<FeedEntry>, FetchError>;
}

/// Outcome of a quote request that reached the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteResponse {
    Found(DailyBar),
    /// The provider answered, but not with usable values for the requested day
    Malformed(String),
}

/// Daily open/close/high/low/volume provider
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn daily_bar(&self, symbol: &str, day: NaiveDate) -> Result<QuoteResponse, FetchError>;
}

/// Text sentiment capability.
///
/// Implementations return a compound score in `[-1.0, 1.0]`.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> f64;
}

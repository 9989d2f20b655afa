use chrono::NaiveDate;
use thiserror::Error;

/// Fatal configuration problems, raised before any work starts
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Market data API key is not set (MARKET_DATA_API_KEY or --api-key)")]
    MissingApiKey,

    #[error("Invalid market close time {hour:02}:{minute:02}")]
    InvalidCloseTime { hour: u32, minute: u32 },

    #[error("Feed URL template must contain `{{symbol}}`: {template}")]
    InvalidFeedTemplate { template: String },

    #[error("No symbols configured")]
    NoSymbols,
}

/// Network or parsing failure for a single feed or quote request.
/// Isolated to that unit of work; it is retried on the next run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Feed request for {symbol} failed: {reason}")]
    Feed { symbol: String, reason: String },

    #[error("Quote request for {symbol} on {day} failed: {reason}")]
    Quote {
        symbol: String,
        day: NaiveDate,
        reason: String,
    },
}

/// Errors reading or rewriting a persisted table
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unexpected header in {path}: expected `{expected}`, found `{found}`")]
    SchemaMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("Cannot summarize empty news group {key}")]
    EmptyGroup { key: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid day key `{0}`: expected STOCK_YYYY-MM-DD")]
pub struct InvalidDayKey(pub String);

//! Configuration module for stocknews.
//!
//! Configuration is loaded from environment variables (after `.env` via
//! `dotenvy`), organized by concern: Storage and Market Data. Command-line
//! flags override individual fields afterwards.

mod market_data_config;
mod storage_config;

pub use market_data_config::{DEFAULT_HTTP_TIMEOUT_SECS, MarketDataEnvConfig};
pub use storage_config::{
    DEFAULT_DATA_DIR, DEFAULT_NEWS_FILE, DEFAULT_SUMMARY_FILE, StorageEnvConfig,
};

use crate::domain::trading_day::MarketClose;
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Variable lookup, `std::env::var` in production and a map in tests
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Main application configuration, passed explicitly to every pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub symbols: Vec<String>,
    pub storage: StorageEnvConfig,
    pub market_data: MarketDataEnvConfig,
    pub close: MarketClose,
    pub financial_boost: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            storage: StorageEnvConfig::default(),
            market_data: MarketDataEnvConfig::default(),
            close: MarketClose::default(),
            financial_boost: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self> {
        let storage =
            StorageEnvConfig::from_lookup(lookup).context("Failed to load storage config")?;
        let market_data = MarketDataEnvConfig::from_lookup(lookup)
            .context("Failed to load market data config")?;

        let defaults = MarketClose::default();
        let close = MarketClose::new(
            parse_var(lookup, "MARKET_CLOSE_HOUR", defaults.hour())?,
            parse_var(lookup, "MARKET_CLOSE_MINUTE", defaults.minute())?,
        )?;

        Ok(Self {
            symbols: lookup("STOCKNEWS_SYMBOLS")
                .map(|raw| parse_symbols(&raw))
                .unwrap_or_default(),
            storage,
            market_data,
            close,
            financial_boost: parse_var(lookup, "SENTIMENT_FINANCIAL_BOOST", false)?,
        })
    }
}

/// Split a comma separated list into upper-case symbols, dropping blanks and
/// repeats while keeping the first-seen order.
pub fn parse_symbols(raw: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for symbol in raw.split(',').map(|s| s.trim().to_uppercase()) {
        if !symbol.is_empty() && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    symbols
}

pub(crate) fn parse_var<T>(lookup: EnvLookup<'_>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Failed to parse {}", key)),
        None => Ok(default),
    }
}

//! Remote source configuration: headline feed and market-data history API.

use super::{EnvLookup, parse_var};
use crate::domain::errors::ConfigurationError;
use crate::infrastructure::market_data::WORLD_TRADING_DATA_URL;
use crate::infrastructure::news::rss::YAHOO_FEED_TEMPLATE;
use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketDataEnvConfig {
    /// Feed URL with a `{symbol}` placeholder
    pub feed_url_template: String,
    pub market_data_url: String,
    /// Only required by enrichment
    pub api_key: Option<String>,
    pub http_timeout: Duration,
}

impl Default for MarketDataEnvConfig {
    fn default() -> Self {
        Self {
            feed_url_template: YAHOO_FEED_TEMPLATE.to_string(),
            market_data_url: WORLD_TRADING_DATA_URL.to_string(),
            api_key: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl MarketDataEnvConfig {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self> {
        let config = Self {
            feed_url_template: lookup("FEED_URL_TEMPLATE")
                .unwrap_or_else(|| YAHOO_FEED_TEMPLATE.to_string()),
            market_data_url: lookup("MARKET_DATA_URL")
                .unwrap_or_else(|| WORLD_TRADING_DATA_URL.to_string()),
            api_key: lookup("MARKET_DATA_API_KEY").filter(|key| !key.trim().is_empty()),
            http_timeout: Duration::from_secs(parse_var(
                lookup,
                "HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.feed_url_template.contains("{symbol}") {
            return Err(ConfigurationError::InvalidFeedTemplate {
                template: self.feed_url_template.clone(),
            }
            .into());
        }
        Url::parse(&self.feed_url_template.replace("{symbol}", "AAPL"))
            .with_context(|| format!("Invalid FEED_URL_TEMPLATE: {}", self.feed_url_template))?;
        Url::parse(&self.market_data_url)
            .with_context(|| format!("Invalid MARKET_DATA_URL: {}", self.market_data_url))?;
        Ok(())
    }
}

use crate::config::{Config, StorageEnvConfig};
use crate::domain::errors::ConfigurationError;
use crate::domain::news::NewsItem;
use crate::domain::ports::{NewsFeed, QuoteProvider, SentimentScorer};
use crate::domain::repositories::RecordStore;
use crate::domain::summary::DailySummary;
use crate::infrastructure::core::HttpClientFactory;
use crate::infrastructure::market_data::HistoryQuoteProvider;
use crate::infrastructure::news::{RssNewsFeed, VaderSentimentScorer};
use crate::infrastructure::persistence::CsvStore;
use crate::infrastructure::repositories::InMemoryStore;
use reqwest::Client;
use std::sync::Arc;
use tracing::info;

pub type NewsStore = Arc<dyn RecordStore<NewsItem>>;
pub type SummaryStore = Arc<dyn RecordStore<DailySummary>>;

/// Wires the production adapters from configuration.
pub struct ServiceFactory;

impl ServiceFactory {
    pub fn create_stores(storage: &StorageEnvConfig) -> (NewsStore, SummaryStore) {
        if storage.use_csv {
            info!(
                "Using CSV tables {:?} and {:?}",
                storage.news_path(),
                storage.summary_path()
            );
            (
                Arc::new(CsvStore::<NewsItem>::new(storage.news_path())),
                Arc::new(CsvStore::<DailySummary>::new(storage.summary_path())),
            )
        } else {
            info!("Using in-memory tables; nothing will be written to disk");
            (
                Arc::new(InMemoryStore::<NewsItem>::new()),
                Arc::new(InMemoryStore::<DailySummary>::new()),
            )
        }
    }

    pub fn create_http_client(config: &Config) -> Client {
        HttpClientFactory::create_client(config.market_data.http_timeout)
    }

    pub fn create_news_feed(config: &Config, client: Client) -> Arc<dyn NewsFeed> {
        Arc::new(RssNewsFeed::new(
            client,
            config.market_data.feed_url_template.clone(),
        ))
    }

    pub fn create_scorer(config: &Config) -> Arc<dyn SentimentScorer> {
        Arc::new(VaderSentimentScorer::with_financial_boost(
            config.financial_boost,
        ))
    }

    /// Fails with `MissingApiKey` when no key is configured.
    pub fn create_quote_provider(
        config: &Config,
        client: Client,
    ) -> Result<Arc<dyn QuoteProvider>, ConfigurationError> {
        let provider = HistoryQuoteProvider::new(
            client,
            config.market_data.market_data_url.clone(),
            config.market_data.api_key.clone(),
        )?;
        Ok(Arc::new(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_stores_start_empty() {
        let storage = StorageEnvConfig {
            use_csv: false,
            ..StorageEnvConfig::default()
        };
        let (news, summaries) = ServiceFactory::create_stores(&storage);
        assert!(news.load().await.unwrap().is_empty());
        assert!(summaries.load().await.unwrap().is_empty());
    }

    #[test]
    fn test_quote_provider_requires_api_key() {
        let config = Config::default();
        let client = ServiceFactory::create_http_client(&config);
        assert!(matches!(
            ServiceFactory::create_quote_provider(&config, client),
            Err(ConfigurationError::MissingApiKey)
        ));
    }
}

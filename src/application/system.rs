use crate::application::aggregation::{AggregationPipeline, AggregationReport};
use crate::application::enrichment::{EnrichmentPipeline, EnrichmentReport};
use crate::application::ingestion::{IngestReport, IngestionPipeline};
use crate::config::Config;
use crate::domain::errors::ConfigurationError;
use crate::domain::ports::{NewsFeed, QuoteProvider, SentimentScorer};
use crate::infrastructure::factory::{NewsStore, ServiceFactory, SummaryStore};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

/// Results of a full ingest, summarize, enrich cycle
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub ingest: IngestReport,
    pub aggregation: AggregationReport,
    pub enrichment: EnrichmentReport,
}

/// Owns the configured adapters and runs the three pipelines against them.
pub struct Application {
    pub config: Config,
    pub news_store: NewsStore,
    pub summary_store: SummaryStore,
    feed: Arc<dyn NewsFeed>,
    scorer: Arc<dyn SentimentScorer>,
    /// `None` when no API key is configured
    quotes: Option<Arc<dyn QuoteProvider>>,
}

impl Application {
    pub fn build(config: Config) -> Result<Self> {
        info!(
            "Building stocknews (close {} UTC, {} symbols)",
            config.close,
            config.symbols.len()
        );

        let (news_store, summary_store) = ServiceFactory::create_stores(&config.storage);
        let client = ServiceFactory::create_http_client(&config);
        let feed = ServiceFactory::create_news_feed(&config, client.clone());
        let scorer = ServiceFactory::create_scorer(&config);
        let quotes = match ServiceFactory::create_quote_provider(&config, client) {
            Ok(quotes) => Some(quotes),
            Err(ConfigurationError::MissingApiKey) => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            config,
            news_store,
            summary_store,
            feed,
            scorer,
            quotes,
        })
    }

    /// Assemble from explicit adapters.
    pub fn with_services(
        config: Config,
        news_store: NewsStore,
        summary_store: SummaryStore,
        feed: Arc<dyn NewsFeed>,
        scorer: Arc<dyn SentimentScorer>,
        quotes: Option<Arc<dyn QuoteProvider>>,
    ) -> Self {
        Self {
            config,
            news_store,
            summary_store,
            feed,
            scorer,
            quotes,
        }
    }

    pub async fn ingest(&self) -> Result<IngestReport> {
        if self.config.symbols.is_empty() {
            return Err(ConfigurationError::NoSymbols.into());
        }

        let pipeline = IngestionPipeline::new(
            self.feed.clone(),
            self.scorer.clone(),
            self.news_store.clone(),
            self.config.close,
        );
        let report = pipeline.ingest(&self.config.symbols).await?;
        info!("Total news: {} ({} added)", report.items.len(), report.added);
        Ok(report)
    }

    pub async fn summarize(&self) -> Result<AggregationReport> {
        AggregationPipeline::new(self.news_store.clone(), self.summary_store.clone())
            .run()
            .await
    }

    /// Enrich unresolved summaries, optionally for one symbol only.
    ///
    /// Fails with `MissingApiKey` before any request when no key is set.
    pub async fn enrich(&self, symbol: Option<String>, now: DateTime<Utc>) -> Result<EnrichmentReport> {
        let quotes = self.quote_provider()?;
        let (_, report) = EnrichmentPipeline::new(quotes, self.summary_store.clone())
            .with_symbol(symbol)
            .run(now)
            .await?;
        Ok(report)
    }

    /// Ingest, summarize and enrich in order. The API key is checked first so
    /// a misconfigured run does no network work at all.
    pub async fn run_all(&self, now: DateTime<Utc>) -> Result<RunReport> {
        self.quote_provider()?;

        let ingest = self.ingest().await?;
        let aggregation = self.summarize().await?;
        let enrichment = self.enrich(None, now).await?;

        Ok(RunReport {
            ingest,
            aggregation,
            enrichment,
        })
    }

    fn quote_provider(&self) -> Result<Arc<dyn QuoteProvider>, ConfigurationError> {
        self.quotes
            .clone()
            .ok_or(ConfigurationError::MissingApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageEnvConfig;

    fn in_memory_config() -> Config {
        Config {
            storage: StorageEnvConfig {
                use_csv: false,
                ..StorageEnvConfig::default()
            },
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_enrich_without_api_key_fails() {
        let app = Application::build(in_memory_config()).unwrap();
        let err = app.enrich(None, Utc::now()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigurationError>(),
            Some(ConfigurationError::MissingApiKey)
        ));
    }

    #[tokio::test]
    async fn test_ingest_without_symbols_fails() {
        let app = Application::build(in_memory_config()).unwrap();
        let err = app.ingest().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigurationError>(),
            Some(ConfigurationError::NoSymbols)
        ));
    }

    #[tokio::test]
    async fn test_summarize_on_empty_tables() {
        let app = Application::build(in_memory_config()).unwrap();
        let report = app.summarize().await.unwrap();
        assert_eq!(report.created, 0);
    }
}

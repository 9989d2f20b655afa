//! Headline ingestion: fetch, deduplicate, score and append to the news table.

use crate::domain::news::{DayKey, FeedEntry, NewsItem};
use crate::domain::ports::{NewsFeed, SentimentScorer};
use crate::domain::repositories::RecordStore;
use crate::domain::trading_day::{self, MarketClose};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    /// Whole news table after this run
    pub items: Vec<NewsItem>,
    pub added: usize,
    pub failed_symbols: Vec<String>,
}

pub struct IngestionPipeline {
    feed: Arc<dyn NewsFeed>,
    scorer: Arc<dyn SentimentScorer>,
    store: Arc<dyn RecordStore<NewsItem>>,
    close: MarketClose,
}

impl IngestionPipeline {
    pub fn new(
        feed: Arc<dyn NewsFeed>,
        scorer: Arc<dyn SentimentScorer>,
        store: Arc<dyn RecordStore<NewsItem>>,
        close: MarketClose,
    ) -> Self {
        Self {
            feed,
            scorer,
            store,
            close,
        }
    }

    /// Score an entry and attribute it to its trading day.
    pub fn score_entry(&self, symbol: &str, entry: FeedEntry) -> NewsItem {
        let day = trading_day::resolve(entry.published, self.close);
        NewsItem {
            sentiment_title: self.scorer.score(&entry.title),
            sentiment_summary: self.scorer.score(&entry.summary),
            day_key: DayKey::new(symbol, day),
            stock: symbol.to_string(),
            guid: entry.guid,
            title: entry.title,
            summary: entry.summary,
            published: entry.published,
        }
    }

    /// Fetch every symbol in turn and append unseen headlines.
    ///
    /// A failed fetch is logged and skipped. The table is rewritten after
    /// each symbol that added something, so earlier symbols stay committed
    /// if a later write fails.
    pub async fn ingest(&self, symbols: &[String]) -> Result<IngestReport> {
        let mut items = self
            .store
            .load()
            .await
            .context("Failed to load news table")?;
        let mut added = 0;
        let mut failed_symbols = Vec::new();

        for symbol in symbols {
            let entries = match self.feed.fetch_entries(symbol).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Skipping {}: {}", symbol, e);
                    failed_symbols.push(symbol.clone());
                    continue;
                }
            };

            let mut batch = 0;
            for entry in entries {
                // Linear scan over the whole table for every entry
                if items.iter().any(|item| item.guid == entry.guid) {
                    debug!("{}: {} already stored", symbol, entry.guid);
                    continue;
                }
                items.push(self.score_entry(symbol, entry));
                batch += 1;
            }

            if batch > 0 {
                self.store
                    .save(&items)
                    .await
                    .with_context(|| format!("Failed to save news for {}", symbol))?;
            }
            info!("{}: {} new headlines", symbol, batch);
            added += batch;
        }

        Ok(IngestReport {
            items,
            added,
            failed_symbols,
        })
    }
}

//! Market enrichment: resolve closed trading days to win/loss outcomes.

use crate::domain::ports::{QuoteProvider, QuoteResponse};
use crate::domain::repositories::RecordStore;
use crate::domain::summary::DailySummary;
use crate::domain::trading_day;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    /// Every attempted quote request, whatever its outcome
    pub request_count: usize,
    pub resolved: usize,
    /// Unresolved rows whose trading day has not closed yet
    pub pending: usize,
    /// Requests that did not yield usable values
    pub failed: usize,
}

pub struct EnrichmentPipeline {
    quotes: Arc<dyn QuoteProvider>,
    store: Arc<dyn RecordStore<DailySummary>>,
    symbol: Option<String>,
}

impl EnrichmentPipeline {
    pub fn new(quotes: Arc<dyn QuoteProvider>, store: Arc<dyn RecordStore<DailySummary>>) -> Self {
        Self {
            quotes,
            store,
            symbol: None,
        }
    }

    /// Restrict enrichment to a single stock.
    pub fn with_symbol(mut self, symbol: Option<String>) -> Self {
        self.symbol = symbol;
        self
    }

    fn selected(&self, summary: &DailySummary) -> bool {
        self.symbol
            .as_deref()
            .is_none_or(|symbol| summary.stock.eq_ignore_ascii_case(symbol))
    }

    /// Resolve every selected unresolved summary whose day closed before `now`.
    ///
    /// Rows are only written on a usable response, so a failed request leaves
    /// the row exactly as it was.
    pub async fn enrich(&self, summaries: &mut [DailySummary], now: DateTime<Utc>) -> EnrichmentReport {
        let mut report = EnrichmentReport::default();

        for summary in summaries.iter_mut() {
            if summary.outcome.is_resolved() || !self.selected(summary) {
                continue;
            }
            if !trading_day::has_closed(summary.check_day, now) {
                debug!("{}: trading day not closed yet", summary.id);
                report.pending += 1;
                continue;
            }

            report.request_count += 1;
            match self.quotes.daily_bar(&summary.stock, summary.check_day).await {
                Ok(QuoteResponse::Found(bar)) => {
                    if summary.resolve(&bar) {
                        debug!("{}: {}", summary.id, summary.outcome);
                        report.resolved += 1;
                    }
                }
                Ok(QuoteResponse::Malformed(reason)) => {
                    warn!("{}: unusable market data: {}", summary.id, reason);
                    report.failed += 1;
                }
                Err(e) => {
                    warn!("{}: {}", summary.id, e);
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Load, enrich and persist the summary table. The table is only
    /// rewritten when at least one row was resolved.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<(Vec<DailySummary>, EnrichmentReport)> {
        let mut summaries = self
            .store
            .load()
            .await
            .context("Failed to load summary table")?;

        let report = self.enrich(&mut summaries, now).await;
        if report.resolved > 0 {
            self.store
                .save(&summaries)
                .await
                .context("Failed to save summary table")?;
        }

        info!(
            "Enrichment: {} requests, {} resolved, {} failed, {} pending",
            report.request_count, report.resolved, report.failed, report.pending
        );
        Ok((summaries, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::news::{DayKey, NewsItem};
    use crate::domain::summary::{DailyBar, Outcome};
    use crate::infrastructure::mock::MockQuoteProvider;
    use crate::infrastructure::repositories::InMemoryStore;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, d).unwrap()
    }

    fn summary(stock: &str, day: NaiveDate) -> DailySummary {
        let item = NewsItem {
            guid: format!("{}-{}", stock, day),
            stock: stock.to_string(),
            title: "t".to_string(),
            summary: "s".to_string(),
            published: Utc.from_utc_datetime(&day.and_hms_opt(9, 0, 0).unwrap()),
            day_key: DayKey::new(stock, day),
            sentiment_summary: 0.1,
            sentiment_title: 0.2,
        };
        DailySummary::from_group(item.day_key.clone(), &[&item]).unwrap()
    }

    fn bar(open: rust_decimal::Decimal, close: rust_decimal::Decimal) -> DailyBar {
        DailyBar {
            open,
            close,
            high: dec!(130),
            low: dec!(110),
            volume: 42,
        }
    }

    fn pipeline(quotes: &MockQuoteProvider) -> EnrichmentPipeline {
        EnrichmentPipeline::new(
            Arc::new(quotes.clone()),
            Arc::new(InMemoryStore::<DailySummary>::new()),
        )
    }

    #[tokio::test]
    async fn test_open_day_is_never_requested() {
        let quotes = MockQuoteProvider::new();
        let mut rows = vec![summary("AAPL", date(2))];
        // One second before the end of the day
        let now = Utc.with_ymd_and_hms(2021, 3, 2, 23, 59, 58).unwrap();

        let report = pipeline(&quotes).enrich(&mut rows, now).await;

        assert_eq!(report.request_count, 0);
        assert_eq!(report.pending, 1);
        assert!(quotes.requests().await.is_empty());
        assert_eq!(rows[0].outcome, Outcome::Unresolved);
    }

    #[tokio::test]
    async fn test_win_loss_and_failures_are_counted() {
        let quotes = MockQuoteProvider::new();
        quotes.set_bar("AAPL", date(1), bar(dec!(100), dec!(101))).await;
        quotes.set_bar("NFLX", date(1), bar(dec!(100), dec!(100))).await;
        quotes.fail_for("TSLA").await;
        let mut rows = vec![
            summary("AAPL", date(1)),
            summary("NFLX", date(1)),
            summary("TSLA", date(1)),
            summary("MSFT", date(1)),
        ];
        let now = Utc.with_ymd_and_hms(2021, 3, 3, 0, 0, 0).unwrap();

        let report = pipeline(&quotes).enrich(&mut rows, now).await;

        assert_eq!(
            report,
            EnrichmentReport {
                request_count: 4,
                resolved: 2,
                pending: 0,
                failed: 2,
            }
        );
        assert_eq!(rows[0].outcome, Outcome::Win);
        assert_eq!(rows[1].outcome, Outcome::Loss);
        assert_eq!(rows[2].outcome, Outcome::Unresolved);
        assert_eq!(rows[2].open, None);
        assert_eq!(rows[3].outcome, Outcome::Unresolved);
    }

    #[tokio::test]
    async fn test_symbol_filter() {
        let quotes = MockQuoteProvider::new();
        let mut rows = vec![summary("AAPL", date(1)), summary("NFLX", date(1))];
        let now = Utc.with_ymd_and_hms(2021, 3, 3, 0, 0, 0).unwrap();

        pipeline(&quotes)
            .with_symbol(Some("nflx".to_string()))
            .enrich(&mut rows, now)
            .await;

        assert_eq!(quotes.requests().await, vec![("NFLX".to_string(), date(1))]);
    }

    #[tokio::test]
    async fn test_resolved_rows_are_skipped() {
        let quotes = MockQuoteProvider::new();
        let mut resolved = summary("AAPL", date(1));
        resolved.resolve(&bar(dec!(5), dec!(6)));
        let mut rows = vec![resolved.clone()];
        let now = Utc.with_ymd_and_hms(2021, 3, 3, 0, 0, 0).unwrap();

        let report = pipeline(&quotes).enrich(&mut rows, now).await;

        assert_eq!(report, EnrichmentReport::default());
        assert_eq!(rows[0], resolved);
    }
}

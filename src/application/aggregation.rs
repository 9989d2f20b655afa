//! Per (stock, trading day) sentiment aggregation.

use crate::domain::errors::AggregationError;
use crate::domain::news::{DayKey, NewsItem};
use crate::domain::repositories::RecordStore;
use crate::domain::summary::DailySummary;
use anyhow::{Context, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct AggregationReport {
    /// Existing rows first, then new rows in first-appearance order
    pub summaries: Vec<DailySummary>,
    pub created: usize,
}

/// Add an unresolved summary for every news day key without one.
///
/// Existing summaries are kept as they are, even if more news has arrived
/// for their day since they were created.
pub fn summarize(
    news: &[NewsItem],
    existing: Vec<DailySummary>,
) -> Result<AggregationReport, AggregationError> {
    let known: HashSet<DayKey> = existing.iter().map(|s| s.id.clone()).collect();

    let mut order: Vec<&DayKey> = Vec::new();
    let mut groups: HashMap<&DayKey, Vec<&NewsItem>> = HashMap::new();
    for item in news {
        if known.contains(&item.day_key) {
            continue;
        }
        let group = groups.entry(&item.day_key).or_default();
        if group.is_empty() {
            order.push(&item.day_key);
        }
        group.push(item);
    }

    let mut summaries = existing;
    let mut created = 0;
    for key in order {
        let group = groups.get(key).map(Vec::as_slice).unwrap_or_default();
        let summary = DailySummary::from_group(key.clone(), group)?;
        debug!("New summary {} from {} headlines", key, group.len());
        summaries.push(summary);
        created += 1;
    }

    Ok(AggregationReport { summaries, created })
}

pub struct AggregationPipeline {
    news_store: Arc<dyn RecordStore<NewsItem>>,
    summary_store: Arc<dyn RecordStore<DailySummary>>,
}

impl AggregationPipeline {
    pub fn new(
        news_store: Arc<dyn RecordStore<NewsItem>>,
        summary_store: Arc<dyn RecordStore<DailySummary>>,
    ) -> Self {
        Self {
            news_store,
            summary_store,
        }
    }

    pub async fn run(&self) -> Result<AggregationReport> {
        let news = self
            .news_store
            .load()
            .await
            .context("Failed to load news table")?;
        let existing = self
            .summary_store
            .load()
            .await
            .context("Failed to load summary table")?;

        let report = summarize(&news, existing)?;
        if report.created > 0 {
            self.summary_store
                .save(&report.summaries)
                .await
                .context("Failed to save summary table")?;
        }

        info!(
            "Summaries: {} total ({} new from {} headlines)",
            report.summaries.len(),
            report.created,
            news.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::summary::Outcome;
    use chrono::{NaiveDate, TimeZone, Utc};

    const EPS: f64 = 1e-9;

    fn news(guid: &str, stock: &str, day: u32, hour: u32, title: f64, summary: f64) -> NewsItem {
        let date = NaiveDate::from_ymd_opt(2021, 3, day).unwrap();
        NewsItem {
            guid: guid.to_string(),
            stock: stock.to_string(),
            title: format!("title {}", guid),
            summary: format!("summary {}", guid),
            published: Utc.with_ymd_and_hms(2021, 3, day, hour, 0, 0).unwrap(),
            day_key: DayKey::new(stock, date),
            sentiment_summary: summary,
            sentiment_title: title,
        }
    }

    #[test]
    fn test_groups_by_day_key() {
        let items = vec![
            news("a1", "AAPL", 2, 9, 0.1, 0.0),
            news("n1", "NFLX", 2, 10, 0.4, 0.4),
            news("a2", "AAPL", 2, 8, 0.5, 0.2),
            news("a3", "AAPL", 2, 12, -0.2, 0.1),
            news("a4", "AAPL", 3, 12, 0.3, 0.3),
        ];

        let report = summarize(&items, Vec::new()).unwrap();
        assert_eq!(report.created, 3);

        let ids: Vec<String> = report.summaries.iter().map(|s| s.id.to_string()).collect();
        assert_eq!(ids, vec!["AAPL_2021-03-02", "NFLX_2021-03-02", "AAPL_2021-03-03"]);

        let aapl = &report.summaries[0];
        assert_eq!(aapl.outcome, Outcome::Unresolved);
        assert!((aapl.sentiment_title_med - 0.1).abs() < EPS);
        assert!((aapl.sentiment_title_avg - 0.4 / 3.0).abs() < EPS);
        assert!((aapl.sentiment_summary_med - 0.1).abs() < EPS);
        assert_eq!(
            aapl.news_dt,
            Utc.with_ymd_and_hms(2021, 3, 2, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_existing_ids_are_not_recomputed() {
        let first = vec![news("a1", "AAPL", 2, 9, 0.1, 0.1)];
        let existing = summarize(&first, Vec::new()).unwrap().summaries;

        let mut more = first.clone();
        more.push(news("a2", "AAPL", 2, 10, 0.9, 0.9));
        more.push(news("t1", "TSLA", 2, 10, -0.5, -0.5));

        let report = summarize(&more, existing.clone()).unwrap();
        assert_eq!(report.created, 1);
        assert_eq!(report.summaries[0], existing[0]);
        assert_eq!(report.summaries[1].stock, "TSLA");
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let items = vec![
            news("a1", "AAPL", 2, 9, 0.1, 0.1),
            news("a2", "AAPL", 3, 9, 0.2, 0.2),
        ];
        let once = summarize(&items, Vec::new()).unwrap();
        let twice = summarize(&items, once.summaries.clone()).unwrap();
        assert_eq!(twice.created, 0);
        assert_eq!(twice.summaries, once.summaries);
    }

    #[test]
    fn test_empty_news() {
        let report = summarize(&[], Vec::new()).unwrap();
        assert_eq!(report.created, 0);
        assert!(report.summaries.is_empty());
    }
}

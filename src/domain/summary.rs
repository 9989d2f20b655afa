use crate::domain::errors::AggregationError;
use crate::domain::news::{DayKey, NewsItem, feed_time};
use crate::domain::repositories::TableSchema;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics};
use std::fmt;

/// Win/loss classification of a trading day.
///
/// Persisted in the `change` column. Legacy tables wrote `0` for rows that
/// were still waiting for market data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    #[serde(alias = "0")]
    Unresolved,
    Win,
    Loss,
}

impl Outcome {
    /// A session that did not close above its open counts as a loss.
    pub fn from_prices(open: Decimal, close: Decimal) -> Self {
        if open >= close { Self::Loss } else { Self::Win }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved => write!(f, "unresolved"),
            Self::Win => write!(f, "win"),
            Self::Loss => write!(f, "loss"),
        }
    }
}

/// Market values of one trading session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyBar {
    pub open: Decimal,
    pub close: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub volume: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentStats {
    pub average: f64,
    pub median: f64,
}

impl SentimentStats {
    /// `None` for an empty score list.
    ///
    /// The average is sum over count; an even count takes the mean of the two
    /// middle order statistics.
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        let count = scores.len();
        if count == 0 {
            return None;
        }

        let mut data = Data::new(scores.to_vec());
        let middle = count / 2;
        let median = if count % 2 == 1 {
            data.order_statistic(middle + 1)
        } else {
            (data.order_statistic(middle) + data.order_statistic(middle + 1)) / 2.0
        };

        Some(Self {
            average: scores.iter().sum::<f64>() / count as f64,
            median,
        })
    }
}

/// Sentiment aggregate for one stock on one trading day, plus the market
/// outcome once that day has closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub id: DayKey,
    pub stock: String,
    /// Earliest headline attributed to this day
    #[serde(with = "feed_time")]
    pub news_dt: DateTime<Utc>,
    pub check_day: NaiveDate,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub open: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub close: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub high: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub low: Option<Decimal>,
    pub volume: Option<u64>,
    #[serde(rename = "change")]
    pub outcome: Outcome,
    pub sentiment_summary_avg: f64,
    pub sentiment_summary_med: f64,
    pub sentiment_title_avg: f64,
    pub sentiment_title_med: f64,
}

impl DailySummary {
    /// Build an unresolved summary from every news item sharing `key`.
    pub fn from_group(key: DayKey, items: &[&NewsItem]) -> Result<Self, AggregationError> {
        let empty = || AggregationError::EmptyGroup {
            key: key.to_string(),
        };

        let news_dt = items.iter().map(|item| item.published).min().ok_or_else(empty)?;

        let summary_scores: Vec<f64> = items.iter().map(|item| item.sentiment_summary).collect();
        let title_scores: Vec<f64> = items.iter().map(|item| item.sentiment_title).collect();
        let summary_stats = SentimentStats::from_scores(&summary_scores).ok_or_else(empty)?;
        let title_stats = SentimentStats::from_scores(&title_scores).ok_or_else(empty)?;

        Ok(Self {
            stock: key.stock.clone(),
            check_day: key.day,
            id: key,
            news_dt,
            open: None,
            close: None,
            high: None,
            low: None,
            volume: None,
            outcome: Outcome::Unresolved,
            sentiment_summary_avg: summary_stats.average,
            sentiment_summary_med: summary_stats.median,
            sentiment_title_avg: title_stats.average,
            sentiment_title_med: title_stats.median,
        })
    }

    /// Fill in market values and classify the day.
    ///
    /// Returns `false` without touching anything if the row was already
    /// resolved.
    pub fn resolve(&mut self, bar: &DailyBar) -> bool {
        if self.outcome.is_resolved() {
            return false;
        }
        self.open = Some(bar.open);
        self.close = Some(bar.close);
        self.high = Some(bar.high);
        self.low = Some(bar.low);
        self.volume = Some(bar.volume);
        self.outcome = Outcome::from_prices(bar.open, bar.close);
        true
    }
}

impl TableSchema for DailySummary {
    const TABLE: &'static str = "summary";
    const HEADER: &'static [&'static str] = &[
        "id",
        "stock",
        "news_dt",
        "check_day",
        "open",
        "close",
        "high",
        "low",
        "volume",
        "change",
        "sentiment_summary_avg",
        "sentiment_summary_med",
        "sentiment_title_avg",
        "sentiment_title_med",
    ];
}

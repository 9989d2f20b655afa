use crate::domain::errors::InvalidDayKey;
use crate::domain::repositories::TableSchema;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Composite `(stock, trading day)` key, rendered as `AAPL_2021-03-02`.
///
/// Stored as `p_date` on news rows and as `id` on summary rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayKey {
    pub stock: String,
    pub day: NaiveDate,
}

impl DayKey {
    pub fn new(stock: impl Into<String>, day: NaiveDate) -> Self {
        Self {
            stock: stock.into(),
            day,
        }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.stock, self.day.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = InvalidDayKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Symbols may contain underscores, the date never does
        let (stock, day) = s
            .rsplit_once('_')
            .ok_or_else(|| InvalidDayKey(s.to_string()))?;
        if stock.is_empty() {
            return Err(InvalidDayKey(s.to_string()));
        }
        let day = NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map_err(|_| InvalidDayKey(s.to_string()))?;
        Ok(Self::new(stock, day))
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Timestamp format used by the feed and by the persisted tables.
pub mod feed_time {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%a, %d %b %Y %H:%M:%S +0000";

    /// Parse a feed `pubDate`. Other RFC 2822 offsets are accepted and
    /// normalised to UTC.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        NaiveDateTime::parse_from_str(raw, FORMAT)
            .map(|dt| dt.and_utc())
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc2822(raw)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            })
    }

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.format(FORMAT).to_string()
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{}`", raw)))
    }
}

/// One headline as delivered by a news feed, before scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub guid: String,
    pub title: String,
    pub summary: String,
    pub published: DateTime<Utc>,
}

/// A scored headline. Immutable once written; unique by `guid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub guid: String,
    pub stock: String,
    pub title: String,
    pub summary: String,
    #[serde(with = "feed_time")]
    pub published: DateTime<Utc>,
    #[serde(rename = "p_date")]
    pub day_key: DayKey,
    pub sentiment_summary: f64,
    pub sentiment_title: f64,
}

impl TableSchema for NewsItem {
    const TABLE: &'static str = "news";
    const HEADER: &'static [&'static str] = &[
        "guid",
        "stock",
        "title",
        "summary",
        "published",
        "p_date",
        "sentiment_summary",
        "sentiment_title",
    ];
}

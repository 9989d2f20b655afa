//! Mapping of news timestamps to the trading session they can influence.
//!
//! News published after the configured close is attributed to the next
//! calendar day, and weekend days roll forward to Monday. Exchange holidays
//! are not modelled.

use crate::domain::errors::ConfigurationError;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use std::fmt;

/// Time of day (UTC) after which same-day news counts for the next session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketClose {
    time: NaiveTime,
}

impl MarketClose {
    pub fn new(hour: u32, minute: u32) -> Result<Self, ConfigurationError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(|time| Self { time })
            .ok_or(ConfigurationError::InvalidCloseTime { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    pub fn minute(&self) -> u32 {
        self.time.minute()
    }
}

impl Default for MarketClose {
    /// 20:00 UTC, the NASDAQ close during daylight saving time.
    fn default() -> Self {
        Self {
            time: NaiveTime::from_hms_opt(20, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl fmt::Display for MarketClose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.time.format("%H:%M"))
    }
}

/// Resolve the trading day a news item published at `published` affects.
///
/// A timestamp exactly at the close instant still belongs to that day.
pub fn resolve(published: DateTime<Utc>, close: MarketClose) -> NaiveDate {
    let published = published.naive_utc();
    let date = published.date();
    let close_instant = date.and_time(close.time);

    let candidate = if published > close_instant {
        date + Days::new(1)
    } else {
        date
    };

    match candidate.weekday() {
        Weekday::Sat => candidate + Days::new(2),
        Weekday::Sun => candidate + Days::new(1),
        _ => candidate,
    }
}

/// True once the whole of `day` (up to 23:59:59 UTC) lies strictly before `now`.
pub fn has_closed(day: NaiveDate, now: DateTime<Utc>) -> bool {
    day.and_hms_opt(23, 59, 59)
        .is_some_and(|end_of_day| end_of_day.and_utc() < now)
}

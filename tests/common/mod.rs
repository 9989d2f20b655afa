#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use std::path::PathBuf;
use stocknews::domain::news::FeedEntry;
use stocknews::domain::summary::DailyBar;
use uuid::Uuid;

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn entry(guid: &str, title: &str, published: DateTime<Utc>) -> FeedEntry {
    FeedEntry {
        guid: guid.to_string(),
        title: title.to_string(),
        summary: format!("{} (details)", title),
        published,
    }
}

pub fn bar(open: Decimal, close: Decimal) -> DailyBar {
    DailyBar {
        open,
        close,
        high: open.max(close),
        low: open.min(close),
        volume: 1_000_000,
    }
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("stocknews-it-{}", Uuid::new_v4()))
}

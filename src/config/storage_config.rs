//! Table storage configuration.

use super::{EnvLookup, parse_var};
use anyhow::Result;
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_NEWS_FILE: &str = "news.csv";
pub const DEFAULT_SUMMARY_FILE: &str = "summary.csv";

/// Where the news and summary tables live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEnvConfig {
    pub data_dir: PathBuf,
    pub news_file: String,
    pub summary_file: String,
    /// `false` keeps both tables in memory for the lifetime of the process
    pub use_csv: bool,
}

impl Default for StorageEnvConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            news_file: DEFAULT_NEWS_FILE.to_string(),
            summary_file: DEFAULT_SUMMARY_FILE.to_string(),
            use_csv: true,
        }
    }
}

impl StorageEnvConfig {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self> {
        Ok(Self {
            data_dir: lookup("STOCKNEWS_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            news_file: lookup("STOCKNEWS_NEWS_FILE")
                .unwrap_or_else(|| DEFAULT_NEWS_FILE.to_string()),
            summary_file: lookup("STOCKNEWS_SUMMARY_FILE")
                .unwrap_or_else(|| DEFAULT_SUMMARY_FILE.to_string()),
            use_csv: parse_var(lookup, "STOCKNEWS_USE_CSV", true)?,
        })
    }

    pub fn news_path(&self) -> PathBuf {
        self.data_dir.join(&self.news_file)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.data_dir.join(&self.summary_file)
    }
}

use crate::domain::errors::FetchError;
use crate::domain::news::{FeedEntry, feed_time};
use crate::domain::ports::NewsFeed;
use async_trait::async_trait;
use reqwest::Client;
use rss::Channel;
use std::io::Cursor;
use tracing::{debug, warn};

pub const YAHOO_FEED_TEMPLATE: &str =
    "https://feeds.finance.yahoo.com/rss/2.0/headline?s={symbol}&region=US&lang=en-US";

/// Per-symbol RSS headline feed. The URL template carries a `{symbol}`
/// placeholder.
pub struct RssNewsFeed {
    client: Client,
    url_template: String,
}

impl RssNewsFeed {
    pub fn new(client: Client, url_template: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
        }
    }

    pub fn feed_url(&self, symbol: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(symbol.as_bytes()).collect();
        self.url_template.replace("{symbol}", &encoded)
    }

    /// Convert channel items into entries.
    ///
    /// Items without a guid fall back to their link. Items with neither, or
    /// without a parseable `pubDate`, are skipped.
    pub fn entries_from_channel(symbol: &str, channel: &Channel) -> Vec<FeedEntry> {
        let mut entries = Vec::with_capacity(channel.items().len());

        for item in channel.items() {
            let guid = item
                .guid()
                .map(|g| g.value.to_string())
                .or_else(|| item.link().map(|l| l.to_string()))
                .filter(|id| !id.trim().is_empty());
            let Some(guid) = guid else {
                warn!("{}: skipping feed item without guid or link", symbol);
                continue;
            };

            let Some(published) = item.pub_date().and_then(feed_time::parse) else {
                warn!(
                    "{}: skipping item {} with missing or invalid pubDate {:?}",
                    symbol,
                    guid,
                    item.pub_date()
                );
                continue;
            };

            entries.push(FeedEntry {
                guid,
                title: item.title().unwrap_or_default().to_string(),
                summary: item.description().unwrap_or_default().to_string(),
                published,
            });
        }

        entries
    }

    fn feed_error(symbol: &str, reason: impl ToString) -> FetchError {
        FetchError::Feed {
            symbol: symbol.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl NewsFeed for RssNewsFeed {
    async fn fetch_entries(&self, symbol: &str) -> Result<Vec<FeedEntry>, FetchError> {
        let url = self.feed_url(symbol);
        debug!("Fetching RSS feed for {}: {}", symbol, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::feed_error(symbol, e))?;

        if !response.status().is_success() {
            return Err(Self::feed_error(
                symbol,
                format!("HTTP {}", response.status()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::feed_error(symbol, e))?;
        let channel =
            Channel::read_from(Cursor::new(bytes)).map_err(|e| Self::feed_error(symbol, e))?;

        let entries = Self::entries_from_channel(symbol, &channel);
        debug!(
            "{}: {} usable entries of {} items",
            symbol,
            entries.len(),
            channel.items().len()
        );
        Ok(entries)
    }
}

pub mod rss;
pub mod sentiment_analyzer;

pub use self::rss::RssNewsFeed;
pub use sentiment_analyzer::VaderSentimentScorer;

mod common;

use common::{bar, date, entry, utc};
use rust_decimal_macros::dec;
use std::sync::Arc;
use stocknews::application::Application;
use stocknews::config::{Config, StorageEnvConfig};
use stocknews::domain::errors::ConfigurationError;
use stocknews::domain::news::NewsItem;
use stocknews::domain::ports::QuoteProvider;
use stocknews::domain::repositories::RecordStore;
use stocknews::domain::summary::{DailySummary, Outcome};
use stocknews::infrastructure::mock::{MockNewsFeed, MockQuoteProvider, MockSentimentScorer};
use stocknews::infrastructure::repositories::InMemoryStore;
use tokio_test::assert_ok;

struct Harness {
    app: Application,
    feed: MockNewsFeed,
    quotes: MockQuoteProvider,
    summaries: Arc<InMemoryStore<DailySummary>>,
}

fn harness(with_key: bool) -> Harness {
    let config = Config {
        symbols: vec!["AAPL".to_string(), "NFLX".to_string()],
        storage: StorageEnvConfig {
            use_csv: false,
            ..StorageEnvConfig::default()
        },
        ..Config::default()
    };
    let feed = MockNewsFeed::new();
    let quotes = MockQuoteProvider::new();
    let summaries = Arc::new(InMemoryStore::<DailySummary>::new());
    let provider: Option<Arc<dyn QuoteProvider>> = with_key.then(|| {
        let provider: Arc<dyn QuoteProvider> = Arc::new(quotes.clone());
        provider
    });

    let app = Application::with_services(
        config,
        Arc::new(InMemoryStore::<NewsItem>::new()),
        summaries.clone(),
        Arc::new(feed.clone()),
        Arc::new(MockSentimentScorer::new()),
        provider,
    );
    Harness {
        app,
        feed,
        quotes,
        summaries,
    }
}

#[tokio::test]
async fn test_missing_api_key_fails_before_any_request() {
    let h = harness(false);
    h.feed
        .set_entries("AAPL", vec![entry("a1", "Apple", utc(2021, 3, 1, 9, 0))])
        .await;

    let err = h.app.run_all(utc(2021, 3, 10, 0, 0)).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigurationError>(),
        Some(ConfigurationError::MissingApiKey)
    ));
    assert!(h.feed.calls().await.is_empty());
    assert!(h.quotes.requests().await.is_empty());
}

#[tokio::test]
async fn test_enrichment_resolves_only_closed_days() {
    let h = harness(true);
    h.feed
        .set_entries(
            "AAPL",
            vec![
                entry("a1", "Apple up", utc(2021, 3, 1, 9, 0)),
                entry("a2", "Apple later", utc(2021, 3, 3, 9, 0)),
            ],
        )
        .await;
    h.feed
        .set_entries("NFLX", vec![entry("n1", "Netflix", utc(2021, 3, 1, 9, 0))])
        .await;
    h.quotes
        .set_bar("AAPL", date(2021, 3, 1), bar(dec!(120.00), dec!(127.79)))
        .await;
    h.quotes
        .set_bar("NFLX", date(2021, 3, 1), bar(dec!(550.00), dec!(538.61)))
        .await;

    assert_ok!(h.app.ingest().await);
    let aggregation = assert_ok!(h.app.summarize().await);
    assert_eq!(aggregation.created, 3);

    // 2021-03-03 is still trading
    let report = assert_ok!(h.app.enrich(None, utc(2021, 3, 3, 15, 0)).await);
    assert_eq!(report.request_count, 2);
    assert_eq!(report.resolved, 2);
    assert_eq!(report.pending, 1);

    let rows = assert_ok!(h.summaries.load().await);
    let outcome = |id: &str| {
        rows.iter()
            .find(|s| s.id.to_string() == id)
            .map(|s| s.outcome)
    };
    assert_eq!(outcome("AAPL_2021-03-01"), Some(Outcome::Win));
    assert_eq!(outcome("NFLX_2021-03-01"), Some(Outcome::Loss));
    assert_eq!(outcome("AAPL_2021-03-03"), Some(Outcome::Unresolved));
}

#[tokio::test]
async fn test_resolved_rows_survive_later_passes() {
    let h = harness(true);
    h.feed
        .set_entries("AAPL", vec![entry("a1", "Apple", utc(2021, 3, 1, 9, 0))])
        .await;
    h.quotes
        .set_bar("AAPL", date(2021, 3, 1), bar(dec!(100), dec!(90)))
        .await;

    assert_ok!(h.app.ingest().await);
    assert_ok!(h.app.summarize().await);
    assert_ok!(h.app.enrich(None, utc(2021, 3, 5, 0, 0)).await);
    let before = assert_ok!(h.summaries.load().await);

    // A different answer must not overwrite the stored outcome
    h.quotes
        .set_bar("AAPL", date(2021, 3, 1), bar(dec!(90), dec!(100)))
        .await;
    let report = assert_ok!(h.app.enrich(None, utc(2021, 3, 6, 0, 0)).await);
    assert_eq!(report.request_count, 0);

    let after = assert_ok!(h.summaries.load().await);
    assert_eq!(after, before);
    assert_eq!(after[0].outcome, Outcome::Loss);
    assert_eq!(after[0].close, Some(dec!(90)));
}

#[tokio::test]
async fn test_malformed_quote_counts_request_and_retries_next_run() {
    let h = harness(true);
    h.feed
        .set_entries("NFLX", vec![entry("n1", "Netflix", utc(2021, 3, 2, 9, 0))])
        .await;

    assert_ok!(h.app.ingest().await);
    assert_ok!(h.app.summarize().await);

    let first = assert_ok!(h.app.enrich(Some("NFLX".to_string()), utc(2021, 3, 4, 0, 0)).await);
    assert_eq!(first.request_count, 1);
    assert_eq!(first.failed, 1);
    assert_eq!(first.resolved, 0);

    h.quotes
        .set_bar("NFLX", date(2021, 3, 2), bar(dec!(10), dec!(11)))
        .await;
    let second = assert_ok!(h.app.enrich(Some("NFLX".to_string()), utc(2021, 3, 4, 0, 0)).await);
    assert_eq!(second.resolved, 1);
    assert_eq!(h.quotes.requests().await.len(), 2);
}

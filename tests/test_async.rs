//! Tests for the async wrapper (requires the `async` feature).

#![cfg(feature = "async")]

mod common;

use std::sync::Arc;

use common::FakeHttp;
use deck_pricer::{AsyncDeckPricer, CatalogSource, DeckPricer, FetchConfig, MatchStatus};

const CSV_URL: &str = "https://shop.test/catalog.csv";

#[tokio::test]
async fn fetch_and_quote() {
    let http = Arc::new(FakeHttp::new().with(CSV_URL, common::SAMPLE_CSV));
    let pricer = AsyncDeckPricer::builder()
        .fetch_config(FetchConfig::new(Some(CSV_URL), None))
        .http_client(http.clone())
        .build()
        .await
        .unwrap();

    let outcome = pricer.fetch_catalog().await.unwrap();
    assert_eq!(outcome.source, CatalogSource::Csv);

    let quote = pricer
        .quote("2 Counterspell\n1 Lightning Bolt".to_string(), outcome.catalog)
        .await
        .unwrap();
    assert!(quote
        .matches
        .iter()
        .all(|m| m.status == MatchStatus::AutoMatched));
    assert_eq!(quote.breakdown.base_total_cents, 2 * 250 + 220);

    pricer.close().await.unwrap();
}

#[tokio::test]
async fn run_executes_sync_operations() {
    let pricer = AsyncDeckPricer::new(DeckPricer::builder().build().unwrap());
    let entries = pricer
        .run(|p| Ok(p.parse_decklist("4 Island\n4 Swamp")))
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn fetch_without_config_fails() {
    let pricer = AsyncDeckPricer::builder().build().await.unwrap();
    assert!(pricer.fetch_catalog().await.is_err());
}

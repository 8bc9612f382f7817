//! Tests for Scryfall image enrichment and the rate limiter.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::FakeHttp;
use deck_pricer::{CardVariant, Catalog, ImageEnricher, RateLimiter, VariantType};

const BASE: &str = "https://scryfall.test";

fn enricher(http: &Arc<FakeHttp>) -> ImageEnricher {
    ImageEnricher::new(http.clone())
        .with_base_url(BASE)
        .with_interval(Duration::ZERO)
}

// ---------------------------------------------------------------------------
// RateLimiter
// ---------------------------------------------------------------------------

#[test]
fn first_call_never_waits() {
    let limiter = RateLimiter::new(Duration::from_millis(100));
    assert_eq!(limiter.wait_time(Instant::now()), Duration::ZERO);
}

#[test]
fn call_after_acquire_waits_remaining_interval() {
    let mut limiter = RateLimiter::new(Duration::from_secs(60));
    limiter.acquire();
    let wait = limiter.wait_time(Instant::now());
    assert!(wait > Duration::from_secs(59));
    assert!(wait <= Duration::from_secs(60));
    assert_eq!(
        limiter.wait_time(Instant::now() + Duration::from_secs(61)),
        Duration::ZERO
    );
}

#[test]
fn acquire_spaces_calls() {
    let mut limiter = RateLimiter::new(Duration::from_millis(20));
    let start = Instant::now();
    limiter.acquire();
    limiter.acquire();
    limiter.acquire();
    assert!(start.elapsed() >= Duration::from_millis(40));
}

// ---------------------------------------------------------------------------
// ImageEnricher
// ---------------------------------------------------------------------------

#[test]
fn lookup_url_prefers_collector_number() {
    let http = Arc::new(FakeHttp::new());
    let e = enricher(&http);
    let numbered =
        CardVariant::new("SKU1", "Llanowar Elves", "M19", VariantType::Regular, 100)
            .with_collector_number("314");
    assert_eq!(e.lookup_url(&numbered), "https://scryfall.test/cards/m19/314");

    let named = CardVariant::new("SKU2", "Fire // Ice", "APC", VariantType::Regular, 150);
    assert_eq!(
        e.lookup_url(&named),
        "https://scryfall.test/cards/named?exact=Fire%20%2F%2F%20Ice&set=apc"
    );
}

#[test]
fn enrich_fills_images_and_shares_lookups() {
    let bolt_url = "https://scryfall.test/cards/named?exact=Lightning%20Bolt&set=m11";
    let elves_url = "https://scryfall.test/cards/m19/314";
    let http = Arc::new(
        FakeHttp::new()
            .with(
                bolt_url,
                r#"{"name": "Lightning Bolt", "image_uris": {"normal": "https://img.test/bolt.jpg"}}"#,
            )
            .with(
                elves_url,
                r#"{"card_faces": [{"image_uris": {"normal": "https://img.test/elves.jpg"}}, {}]}"#,
            ),
    );
    let catalog = Catalog::new(vec![
        CardVariant::new("SKU1", "Lightning Bolt", "M11", VariantType::Regular, 220),
        CardVariant::new("SKU2", "Lightning Bolt", "M11", VariantType::Foil, 350),
        CardVariant::new("SKU3", "Llanowar Elves", "M19", VariantType::Regular, 100)
            .with_collector_number("314"),
        CardVariant::new("SKU4", "Opt", "XLN", VariantType::Regular, 20)
            .with_image_url("https://img.test/already.jpg"),
    ]);

    let mut log_lines: Vec<String> = Vec::new();
    let enriched = enricher(&http).enrich(&catalog, &mut |l| log_lines.push(l.to_string()));

    let images: Vec<Option<&str>> = enriched
        .variants()
        .iter()
        .map(|v| v.image_url.as_deref())
        .collect();
    assert_eq!(
        images,
        vec![
            Some("https://img.test/bolt.jpg"),
            Some("https://img.test/bolt.jpg"),
            Some("https://img.test/elves.jpg"),
            Some("https://img.test/already.jpg"),
        ]
    );
    // one request per distinct lookup; the pre-filled variant is skipped
    assert_eq!(http.requests(), vec![bolt_url.to_string(), elves_url.to_string()]);
    assert!(log_lines.is_empty());
    // the input catalog is untouched
    assert!(catalog.variants()[0].image_url.is_none());
}

#[test]
fn failed_lookups_are_reported_and_skipped() {
    let http = Arc::new(
        FakeHttp::new().with("https://scryfall.test/cards/named?exact=Opt&set=xln", "not json"),
    );
    let catalog = Catalog::new(vec![
        CardVariant::new("SKU1", "Opt", "XLN", VariantType::Regular, 20),
        CardVariant::new("SKU2", "Unknown Card", "XXX", VariantType::Regular, 20),
    ]);

    let mut log_lines: Vec<String> = Vec::new();
    let enriched = enricher(&http).enrich(&catalog, &mut |l| log_lines.push(l.to_string()));

    assert_eq!(enriched.len(), 2);
    assert!(enriched.variants().iter().all(|v| v.image_url.is_none()));
    assert_eq!(log_lines.len(), 2);
    assert!(log_lines[0].starts_with("Image lookup for SKU1 failed"));
    assert!(log_lines[1].contains("404"));
}

#[test]
fn card_without_images_yields_none() {
    let http = Arc::new(FakeHttp::new().with(
        "https://scryfall.test/cards/named?exact=Opt&set=xln",
        r#"{"name": "Opt"}"#,
    ));
    let opt = CardVariant::new("SKU1", "Opt", "XLN", VariantType::Regular, 20);
    assert_eq!(enricher(&http).fetch_image_url(&opt).unwrap(), None);
}

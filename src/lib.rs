//! Deck pricer for Rust.
//!
//! Turns a free-text Magic: The Gathering decklist into priced catalog line
//! items. A [`Catalog`] of purchasable variants is ingested from a CSV or HTML
//! export (or fetched remotely with fallbacks), decklist lines are matched
//! against it through a tiered name ladder, and the resolved lines are priced
//! with tiered discounts and shipping.
//!
//! # Quick start
//!
//! ```no_run
//! use deck_pricer::DeckPricer;
//!
//! let pricer = DeckPricer::builder().build().unwrap();
//!
//! let catalog = pricer.ingest_csv(
//!     "SKU,Card Name,Set,Card Type,Base Price\n\
//!      SKU1,Lightning Bolt,M11,Regular,2.20\n",
//! );
//! let quote = pricer.quote("4 Lightning Bolt\n", &catalog);
//! println!("{} cents", quote.breakdown.grand_total_cents);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod decklist;
pub mod enrich;
pub mod error;
pub mod fetch;
pub mod ingest;
pub mod matching;
pub mod models;
pub mod normalize;
pub mod pricing;

#[cfg(feature = "async")]
pub use async_client::AsyncDeckPricer;
pub use enrich::{ImageEnricher, RateLimiter};
pub use error::{PricerError, Result};
pub use fetch::{CatalogFetcher, CatalogSource, FetchConfig, FetchOutcome, HttpFetch};
pub use ingest::TypePriceMap;
pub use matching::MatchingEngine;
pub use models::{
    CardVariant, Catalog, DeckEntry, DeckEntryMatch, MatchCandidate, MatchStatus, Preferences,
    PriceBreakdown, Quote, Section, ShippingMethod, VariantType,
};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use fetch::ReqwestFetcher;

// ---------------------------------------------------------------------------
// DeckPricerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`DeckPricer`].
///
/// Use [`DeckPricer::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](DeckPricerBuilder::build).
pub struct DeckPricerBuilder {
    preferences: Preferences,
    type_prices: TypePriceMap,
    fetch_config: Option<FetchConfig>,
    http: Option<Arc<dyn HttpFetch>>,
    timeout: Duration,
}

impl Default for DeckPricerBuilder {
    fn default() -> Self {
        Self {
            preferences: Preferences::default(),
            type_prices: TypePriceMap::new(),
            fetch_config: None,
            http: None,
            timeout: config::DEFAULT_TIMEOUT,
        }
    }
}

impl DeckPricerBuilder {
    /// Set the matching and section preferences.
    pub fn preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Replace the per-type fallback prices (in dollars).
    pub fn type_prices(mut self, type_prices: TypePriceMap) -> Self {
        self.type_prices = type_prices;
        self
    }

    /// Set one per-type fallback price (in dollars).
    pub fn type_price(mut self, card_type: impl Into<String>, dollars: f64) -> Self {
        self.type_prices.insert(card_type.into(), dollars);
        self
    }

    /// Configure remote catalog endpoints.
    ///
    /// The builder's type prices are used for fetching unless the config
    /// carries its own.
    pub fn fetch_config(mut self, fetch_config: FetchConfig) -> Self {
        self.fetch_config = Some(fetch_config);
        self
    }

    /// Supply the HTTP transport used for fetching and image lookups.
    ///
    /// Defaults to a blocking reqwest client created on first need.
    pub fn http_client(mut self, http: Arc<dyn HttpFetch>) -> Self {
        self.http = Some(http);
        self
    }

    /// Set the HTTP request timeout for the default client.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the pricer.
    ///
    /// A reqwest client is created only when a fetch config is set and no
    /// client was supplied.
    pub fn build(self) -> Result<DeckPricer> {
        let http: Option<Arc<dyn HttpFetch>> = match (self.http, &self.fetch_config) {
            (Some(http), _) => Some(http),
            (None, Some(_)) => Some(Arc::new(ReqwestFetcher::new(self.timeout)?)),
            (None, None) => None,
        };

        let fetch_config = self.fetch_config.map(|mut cfg| {
            if cfg.type_prices.is_empty() {
                cfg.type_prices = self.type_prices.clone();
            }
            cfg
        });

        Ok(DeckPricer {
            preferences: self.preferences,
            type_prices: self.type_prices,
            fetch_config,
            http,
            timeout: self.timeout,
        })
    }
}

// ---------------------------------------------------------------------------
// DeckPricer
// ---------------------------------------------------------------------------

/// The main entry point: ingestion, decklist parsing, matching and pricing.
///
/// All core operations are pure functions over values; the pricer only holds
/// configuration. Network access happens in [`fetch_catalog`](Self::fetch_catalog)
/// and through [`image_enricher`](Self::image_enricher).
pub struct DeckPricer {
    preferences: Preferences,
    type_prices: TypePriceMap,
    fetch_config: Option<FetchConfig>,
    http: Option<Arc<dyn HttpFetch>>,
    timeout: Duration,
}

impl DeckPricer {
    /// Create a new builder for configuring the pricer.
    pub fn builder() -> DeckPricerBuilder {
        DeckPricerBuilder::default()
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn type_prices(&self) -> &TypePriceMap {
        &self.type_prices
    }

    // -- Ingestion -----------------------------------------------------------

    /// Parse a CSV export.
    pub fn ingest_csv(&self, raw: &str) -> Catalog {
        ingest::backfill_prices(ingest::parse_csv(raw, &self.type_prices))
    }

    /// Parse a saved HTML page, including any embedded price map or CSV.
    pub fn ingest_html(&self, html: &str) -> Catalog {
        ingest::parse_html_page(html, &self.type_prices)
    }

    /// Parse text as CSV, falling back to HTML.
    pub fn ingest(&self, text: &str) -> Catalog {
        ingest::backfill_prices(ingest::parse_auto(text, &self.type_prices))
    }

    /// Fetch the catalog from the configured endpoints.
    pub fn fetch_catalog(&self) -> Result<FetchOutcome> {
        self.fetch_catalog_with_log(&mut |_| {})
    }

    /// Fetch the catalog, reporting progress and failures to `on_log`.
    ///
    /// Fails only when no fetch config was set; remote failures fall through
    /// to [`CatalogSource::Unavailable`] with an empty catalog.
    pub fn fetch_catalog_with_log(&self, on_log: &mut dyn FnMut(&str)) -> Result<FetchOutcome> {
        let (Some(cfg), Some(http)) = (&self.fetch_config, &self.http) else {
            return Err(PricerError::InvalidArgument(
                "No fetch config set; use DeckPricerBuilder::fetch_config".into(),
            ));
        };
        let fetcher = CatalogFetcher::new(Arc::clone(http), cfg.clone());
        Ok(fetcher.fetch_with_log(on_log))
    }

    /// An image enricher over this pricer's HTTP transport.
    ///
    /// Uses the supplied client if any, else a fresh reqwest client.
    pub fn image_enricher(&self) -> Result<ImageEnricher> {
        let http: Arc<dyn HttpFetch> = match &self.http {
            Some(http) => Arc::clone(http),
            None => Arc::new(ReqwestFetcher::new(self.timeout)?),
        };
        Ok(ImageEnricher::new(http))
    }

    // -- Decklist pipeline ---------------------------------------------------

    /// Parse a decklist with the preference section switches.
    pub fn parse_decklist(&self, text: &str) -> Vec<DeckEntry> {
        decklist::parse(
            text,
            self.preferences.include_sideboard,
            self.preferences.include_commanders,
        )
    }

    pub fn match_entries(&self, entries: &[DeckEntry], catalog: &Catalog) -> Vec<DeckEntryMatch> {
        MatchingEngine::new(&self.preferences).match_all(entries, catalog)
    }

    pub fn price(&self, matches: &[DeckEntryMatch]) -> PriceBreakdown {
        pricing::calculate(matches)
    }

    /// Parse, match and price a decklist in one call.
    pub fn quote(&self, deck_text: &str, catalog: &Catalog) -> Quote {
        let entries = self.parse_decklist(deck_text);
        let matches = self.match_entries(&entries, catalog);
        let breakdown = self.price(&matches);
        log::info!(
            "Quoted {} entries: {} cards, {} cents",
            entries.len(),
            breakdown.card_count,
            breakdown.grand_total_cents
        );
        Quote {
            entries,
            matches,
            breakdown,
        }
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for DeckPricer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let endpoint = self
            .fetch_config
            .as_ref()
            .and_then(|c| c.csv_url.as_deref().or(c.html_url.as_deref()))
            .unwrap_or("none");
        write!(
            f,
            "DeckPricer(variant_priority=[{}], set_priority=[{}], fuzzy={}, endpoint={})",
            self.preferences.variant_priority.join(", "),
            self.preferences.set_priority.join(", "),
            self.preferences.fuzzy_enabled,
            endpoint
        )
    }
}

//! Remote catalog retrieval with fallbacks.
//!
//! Strategies, in order, stopping at the first that yields variants:
//!
//! 1. the direct CSV endpoint
//! 2. the same endpoint paginated with a page query parameter
//! 3. the HTML page: embedded `EXAMPLE_CSV`, then card blocks, then the
//!    largest table (with an embedded `CARD_TYPE_PRICES` map applied)
//!
//! Failures never escape: each one is logged, reported to the caller's
//! callback, and the next strategy runs. Pagination is bounded by a page
//! ceiling and stops when a page body repeats an earlier one.

pub mod http;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::config;
use crate::ingest::{self, embedded, TypePriceMap};
use crate::models::{CardVariant, Catalog};

pub use http::{HttpFetch, ReqwestFetcher};

// ---------------------------------------------------------------------------
// FetchConfig
// ---------------------------------------------------------------------------

/// Where and how to fetch a remote catalog.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub csv_url: Option<String>,
    pub html_url: Option<String>,
    /// Query parameter incremented for naive pagination.
    pub page_param: String,
    /// Hard ceiling on paginated requests.
    pub max_pages: usize,
    /// A page with fewer rows than this is taken as the last page.
    pub min_rows_per_page: usize,
    /// Caller-supplied type prices; embedded page prices override them.
    pub type_prices: TypePriceMap,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            csv_url: None,
            html_url: None,
            page_param: config::DEFAULT_PAGE_PARAM.to_string(),
            max_pages: config::DEFAULT_MAX_PAGES,
            min_rows_per_page: config::DEFAULT_MIN_ROWS_PER_PAGE,
            type_prices: TypePriceMap::new(),
        }
    }
}

impl FetchConfig {
    pub fn new(csv_url: Option<&str>, html_url: Option<&str>) -> Self {
        Self {
            csv_url: csv_url.map(str::to_string),
            html_url: html_url.map(str::to_string),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// FetchOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Csv,
    PaginatedCsv { pages: usize },
    EmbeddedCsv,
    Html,
    /// Every strategy failed; the catalog is empty.
    Unavailable,
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Csv => write!(f, "CSV endpoint"),
            CatalogSource::PaginatedCsv { pages } => write!(f, "paginated CSV ({} pages)", pages),
            CatalogSource::EmbeddedCsv => write!(f, "embedded example CSV"),
            CatalogSource::Html => write!(f, "HTML page"),
            CatalogSource::Unavailable => write!(f, "unavailable"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub catalog: Catalog,
    pub source: CatalogSource,
    /// The type prices in effect for the parse (caller's, plus embedded).
    pub type_prices: TypePriceMap,
}

// ---------------------------------------------------------------------------
// CatalogFetcher
// ---------------------------------------------------------------------------

pub struct CatalogFetcher {
    http: Arc<dyn HttpFetch>,
    config: FetchConfig,
}

impl CatalogFetcher {
    pub fn new(http: Arc<dyn HttpFetch>, config: FetchConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch the catalog, logging progress through the `log` facade only.
    pub fn fetch(&self) -> FetchOutcome {
        self.fetch_with_log(&mut |_| {})
    }

    /// Fetch the catalog, also reporting each progress or failure line to `on_log`.
    ///
    /// Any variant left with a zero price is backfilled from the default
    /// price table for its type.
    pub fn fetch_with_log(&self, on_log: &mut dyn FnMut(&str)) -> FetchOutcome {
        let mut reporter = Reporter { sink: on_log };
        let prices = self.config.type_prices.clone();

        if let Some(url) = &self.config.csv_url {
            match self.http.get_text(url) {
                Ok(body) => {
                    let catalog = ingest::csv::parse(&body, &prices);
                    if !catalog.is_empty() {
                        reporter.info(format!("Loaded {} variants from {}", catalog.len(), url));
                        return finish(catalog, CatalogSource::Csv, prices);
                    }
                    reporter.warn(format!("CSV endpoint {} returned no usable rows", url));
                }
                Err(e) => reporter.warn(format!("CSV fetch from {} failed: {}", url, e)),
            }

            if let Some((catalog, pages)) = self.fetch_paginated(url, &prices, &mut reporter) {
                reporter.info(format!(
                    "Loaded {} variants from {} pages",
                    catalog.len(),
                    pages
                ));
                return finish(catalog, CatalogSource::PaginatedCsv { pages }, prices);
            }
        }

        if let Some(url) = &self.config.html_url {
            match self.http.get_text(url) {
                Ok(html) => {
                    let prices = embedded::merged_type_prices(&html, &prices);

                    if let Some(block) = embedded::extract_example_csv(&html) {
                        let catalog = ingest::csv::parse(&block, &prices);
                        if !catalog.is_empty() {
                            reporter.info(format!(
                                "Loaded {} variants from embedded CSV",
                                catalog.len()
                            ));
                            return finish(catalog, CatalogSource::EmbeddedCsv, prices);
                        }
                    }

                    let catalog = ingest::html::parse(&html, &prices);
                    if !catalog.is_empty() {
                        reporter.info(format!("Loaded {} variants from HTML", catalog.len()));
                        return finish(catalog, CatalogSource::Html, prices);
                    }
                    reporter.warn(format!("HTML page {} had no usable catalog data", url));
                }
                Err(e) => reporter.warn(format!("HTML fetch from {} failed: {}", url, e)),
            }
        }

        reporter.warn("No catalog source produced any variants".to_string());
        FetchOutcome {
            catalog: Catalog::default(),
            source: CatalogSource::Unavailable,
            type_prices: prices,
        }
    }

    /// Walk `?page=1..=max_pages` until a page fails, repeats, or comes up short.
    ///
    /// Pages without their own header are re-parsed under the first page's
    /// header. Variants are de-duplicated by SKU, first wins.
    fn fetch_paginated(
        &self,
        base_url: &str,
        prices: &TypePriceMap,
        reporter: &mut Reporter<'_>,
    ) -> Option<(Catalog, usize)> {
        let mut seen_bodies: HashSet<String> = HashSet::new();
        let mut seen_skus: HashSet<String> = HashSet::new();
        let mut header: Option<String> = None;
        let mut variants: Vec<CardVariant> = Vec::new();
        let mut pages = 0usize;

        for page in 1..=self.config.max_pages {
            let url = page_url(base_url, &self.config.page_param, page);
            let body = match self.http.get_text(&url) {
                Ok(body) => body,
                Err(e) => {
                    reporter.warn(format!("Page {} fetch failed: {}", page, e));
                    break;
                }
            };

            if !seen_bodies.insert(body_hash(&body)) {
                reporter.info(format!("Page {} repeats an earlier page; stopping", page));
                break;
            }

            let mut catalog = ingest::csv::parse(&body, prices);
            if catalog.is_empty() {
                if let Some(h) = &header {
                    catalog = ingest::csv::parse(&format!("{}\n{}", h, body), prices);
                }
            } else if header.is_none() {
                header = first_line(&body);
            }

            pages += 1;
            let rows = catalog.len();
            for variant in catalog.into_variants() {
                if seen_skus.insert(variant.sku.clone()) {
                    variants.push(variant);
                }
            }

            if rows < self.config.min_rows_per_page {
                reporter.info(format!("Page {} has {} rows; treating as last", page, rows));
                break;
            }
        }

        (!variants.is_empty()).then(|| (Catalog::new(variants), pages))
    }
}

fn finish(catalog: Catalog, source: CatalogSource, type_prices: TypePriceMap) -> FetchOutcome {
    FetchOutcome {
        catalog: ingest::backfill_prices(catalog),
        source,
        type_prices,
    }
}

pub fn page_url(base_url: &str, param: &str, page: usize) -> String {
    let sep = if base_url.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", base_url, sep, param, page)
}

/// Hex SHA-256 of a page body, for loop detection.
pub fn body_hash(body: &str) -> String {
    hex::encode(Sha256::digest(body.as_bytes()))
}

fn first_line(body: &str) -> Option<String> {
    ingest::csv::preprocess(body)
        .lines()
        .find(|l| !l.trim().is_empty())
        .map(str::to_string)
}

/// Sends each message to both the `log` facade and the caller's callback.
struct Reporter<'a> {
    sink: &'a mut dyn FnMut(&str),
}

impl Reporter<'_> {
    fn info(&mut self, msg: String) {
        log::info!("{}", msg);
        (self.sink)(msg.as_str());
    }

    fn warn(&mut self, msg: String) {
        log::warn!("{}", msg);
        (self.sink)(msg.as_str());
    }
}

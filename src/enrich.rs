//! Image URL enrichment from Scryfall.
//!
//! Each [`ImageEnricher`] owns its [`RateLimiter`]; there is no process-wide
//! throttle state.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::config;
use crate::error::Result;
use crate::fetch::HttpFetch;
use crate::models::{CardVariant, Catalog};

// ---------------------------------------------------------------------------
// RateLimiter
// ---------------------------------------------------------------------------

/// Enforces a minimum spacing between consecutive calls.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    last: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// How long a call made at `now` would have to wait.
    pub fn wait_time(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => self
                .min_interval
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Block until the next call is allowed, then record it.
    pub fn acquire(&mut self) {
        let wait = self.wait_time(Instant::now());
        if !wait.is_zero() {
            thread::sleep(wait);
        }
        self.last = Some(Instant::now());
    }
}

// ---------------------------------------------------------------------------
// Scryfall response subset
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ImageUris {
    normal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CardFace {
    #[serde(default)]
    image_uris: Option<ImageUris>,
}

#[derive(Debug, Deserialize)]
struct ScryfallImageCard {
    #[serde(default)]
    image_uris: Option<ImageUris>,
    /// For double-faced cards, images are in card_faces
    #[serde(default)]
    card_faces: Option<Vec<CardFace>>,
}

impl ScryfallImageCard {
    fn image_url(self) -> Option<String> {
        if let Some(url) = self.image_uris.and_then(|u| u.normal) {
            return Some(url);
        }
        self.card_faces?
            .into_iter()
            .next()?
            .image_uris?
            .normal
    }
}

// ---------------------------------------------------------------------------
// ImageEnricher
// ---------------------------------------------------------------------------

pub struct ImageEnricher {
    http: Arc<dyn HttpFetch>,
    limiter: RateLimiter,
    base_url: String,
}

impl ImageEnricher {
    pub fn new(http: Arc<dyn HttpFetch>) -> Self {
        Self {
            http,
            limiter: RateLimiter::new(config::DEFAULT_IMAGE_LOOKUP_INTERVAL),
            base_url: config::SCRYFALL_API.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_interval(mut self, min_interval: Duration) -> Self {
        self.limiter = RateLimiter::new(min_interval);
        self
    }

    /// Lookup URL: by set and collector number when known, else by exact name.
    pub fn lookup_url(&self, variant: &CardVariant) -> String {
        let set = variant.set_code.to_lowercase();
        match &variant.collector_number {
            Some(number) => format!(
                "{}/cards/{}/{}",
                self.base_url,
                urlencoding::encode(&set),
                urlencoding::encode(number)
            ),
            None => format!(
                "{}/cards/named?exact={}&set={}",
                self.base_url,
                urlencoding::encode(&variant.name_original),
                urlencoding::encode(&set)
            ),
        }
    }

    /// Fetch the image URL for one variant.
    pub fn fetch_image_url(&mut self, variant: &CardVariant) -> Result<Option<String>> {
        let url = self.lookup_url(variant);
        self.limiter.acquire();
        let body = self.http.get_text(&url)?;
        let card: ScryfallImageCard = serde_json::from_str(&body)?;
        Ok(card.image_url())
    }

    /// Return a new catalog with image URLs filled in where a lookup succeeds.
    ///
    /// Variants that already carry an image are skipped. Variants sharing a
    /// lookup URL (e.g. the regular and foil printing) share one request.
    /// Failures are reported to `on_log` and skipped.
    pub fn enrich(&mut self, catalog: &Catalog, on_log: &mut dyn FnMut(&str)) -> Catalog {
        let mut by_lookup: HashMap<String, Option<String>> = HashMap::new();
        let mut by_sku: HashMap<String, String> = HashMap::new();

        for variant in catalog.variants() {
            if variant.image_url.is_some() {
                continue;
            }
            let key = self.lookup_url(variant);
            let image = match by_lookup.get(&key) {
                Some(cached) => cached.clone(),
                None => {
                    let fetched = match self.fetch_image_url(variant) {
                        Ok(image) => image,
                        Err(e) => {
                            let msg = format!("Image lookup for {} failed: {}", variant.sku, e);
                            log::warn!("{}", msg);
                            on_log(msg.as_str());
                            None
                        }
                    };
                    by_lookup.insert(key, fetched.clone());
                    fetched
                }
            };
            if let Some(url) = image {
                by_sku.insert(variant.sku.clone(), url);
            }
        }

        log::info!("Enriched {} variants with image URLs", by_sku.len());
        catalog.with_image_urls(&by_sku)
    }
}

use std::path::PathBuf;
use std::time::Duration;

use crate::models::VariantType;

pub const USER_AGENT: &str = concat!("deck-pricer/", env!("CARGO_PKG_VERSION"));

pub const SCRYFALL_API: &str = "https://api.scryfall.com";

// ---------------------------------------------------------------------------
// Default per-type prices (used when the catalog carries no usable price)
// ---------------------------------------------------------------------------

pub const DEFAULT_REGULAR_PRICE: f64 = 2.20;
pub const DEFAULT_HOLO_PRICE: f64 = 3.00;
pub const DEFAULT_FOIL_PRICE: f64 = 3.50;

/// Largest per-card price accepted from a catalog; anything above is treated
/// as unparsable.
pub const MAX_PRICE_DOLLARS: f64 = 100_000.0;

pub fn default_price_dollars(variant: VariantType) -> f64 {
    match variant {
        VariantType::Regular => DEFAULT_REGULAR_PRICE,
        VariantType::Holo => DEFAULT_HOLO_PRICE,
        VariantType::Foil => DEFAULT_FOIL_PRICE,
    }
}

pub fn default_price_cents(variant: VariantType) -> u64 {
    match variant {
        VariantType::Regular => 220,
        VariantType::Holo => 300,
        VariantType::Foil => 350,
    }
}

// ---------------------------------------------------------------------------
// Discount and shipping rules
// ---------------------------------------------------------------------------

/// `(threshold in cents, percent)`; the first tier whose threshold is strictly
/// exceeded wins. Ordered from highest to lowest.
pub const DISCOUNT_TIERS: &[(u64, u64)] = &[
    (40_000, 50),
    (30_000, 35),
    (20_000, 30),
    (16_000, 25),
    (10_000, 15),
    (6_000, 5),
];

pub const EXPRESS_SHIPPING_THRESHOLD_CENTS: u64 = 30_000;
pub const FREE_SHIPPING_THRESHOLD_CENTS: u64 = 10_000;
pub const STANDARD_SHIPPING_CENTS: u64 = 1_000;

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Normalized names up to this many characters use the short fuzzy threshold.
pub const FUZZY_SHORT_NAME_LEN: usize = 15;
pub const FUZZY_SHORT_THRESHOLD: usize = 2;
pub const FUZZY_LONG_THRESHOLD: usize = 3;

// ---------------------------------------------------------------------------
// Remote catalog fetch
// ---------------------------------------------------------------------------

pub const DEFAULT_MAX_PAGES: usize = 50;
pub const DEFAULT_MIN_ROWS_PER_PAGE: usize = 1;
pub const DEFAULT_PAGE_PARAM: &str = "page";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_IMAGE_LOOKUP_INTERVAL: Duration = Duration::from_millis(100);

pub fn default_preferences_path() -> PathBuf {
    if let Some(config) = dirs::config_dir() {
        config.join("deck-pricer").join("preferences.json")
    } else {
        PathBuf::from(".deck-pricer").join("preferences.json")
    }
}

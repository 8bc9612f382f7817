//! Shared test fixtures for the deck-pricer integration tests.
//!
//! Provides `sample_catalog()`, a small hand-built catalog covering reprints,
//! finishes and awkward names, and `FakeHttp`, an [`HttpFetch`] serving canned
//! bodies per URL and recording every request.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use deck_pricer::{CardVariant, Catalog, HttpFetch, PricerError, Result, VariantType};

/// Catalog used across the matching and pricing tests.
///
/// | SKU  | Name                    | Set | Type    | Cents | No. |
/// |------|-------------------------|-----|---------|-------|-----|
/// | SKU1 | Lightning Bolt          | M11 | Regular | 220   |     |
/// | SKU2 | Lightning Bolt          | M11 | Foil    | 350   |     |
/// | SKU3 | Lightning Bolt          | A25 | Regular | 200   |     |
/// | SKU4 | Lightning Bolt          | A25 | Holo    | 300   |     |
/// | SKU5 | Counterspell            | 7ED | Regular | 250   |     |
/// | SKU6 | Jace, the Mind Sculptor | WWK | Regular | 9999  |     |
/// | SKU7 | Fire // Ice             | APC | Regular | 150   |     |
/// | SKU8 | Llanowar Elves          | M19 | Regular | 100   | 314 |
pub fn sample_catalog() -> Catalog {
    Catalog::new(vec![
        CardVariant::new("SKU1", "Lightning Bolt", "M11", VariantType::Regular, 220),
        CardVariant::new("SKU2", "Lightning Bolt", "M11", VariantType::Foil, 350),
        CardVariant::new("SKU3", "Lightning Bolt", "A25", VariantType::Regular, 200),
        CardVariant::new("SKU4", "Lightning Bolt", "A25", VariantType::Holo, 300),
        CardVariant::new("SKU5", "Counterspell", "7ED", VariantType::Regular, 250),
        CardVariant::new("SKU6", "Jace, the Mind Sculptor", "WWK", VariantType::Regular, 9999),
        CardVariant::new("SKU7", "Fire // Ice", "APC", VariantType::Regular, 150),
        CardVariant::new("SKU8", "Llanowar Elves", "M19", VariantType::Regular, 100)
            .with_collector_number("314"),
    ])
}

pub const SAMPLE_CSV: &str = "\
SKU,Card Name,Set,Card Type,Base Price
SKU1,Lightning Bolt,M11,Regular,2.20
SKU2,Lightning Bolt,M11,Foil,3.50
SKU3,Counterspell,7ED,Regular,$2.50
";

/// In-memory transport: known URLs return their body, anything else a 404.
#[derive(Default)]
pub struct FakeHttp {
    responses: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.to_string(), body.to_string());
        self
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpFetch for FakeHttp {
    fn get_text(&self, url: &str) -> Result<String> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| PricerError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}

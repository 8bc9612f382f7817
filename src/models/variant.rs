use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// VariantType: printing/finish of a catalog entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantType {
    Regular,
    Foil,
    Holo,
}

impl VariantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantType::Regular => "Regular",
            VariantType::Foil => "Foil",
            VariantType::Holo => "Holo",
        }
    }

    /// Canonicalize a free-form card type cell.
    ///
    /// Case-insensitive substring match, checked in order: "foil", then
    /// "holo"; anything else is `Regular`.
    pub fn canonicalize(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("foil") {
            VariantType::Foil
        } else if lower.contains("holo") {
            VariantType::Holo
        } else {
            VariantType::Regular
        }
    }

    /// True when the cell looks like a variant token at all.
    pub fn is_token(raw: &str) -> bool {
        let lower = raw.to_lowercase();
        lower.contains("foil") || lower.contains("holo") || lower.contains("regular")
    }

    pub fn all() -> &'static [VariantType] {
        &[VariantType::Regular, VariantType::Foil, VariantType::Holo]
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CardVariant: one priced, SKU-identified printing of a card
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardVariant {
    pub name_original: String,
    pub name_normalized: String,
    pub set_code: String,
    pub sku: String,
    pub variant_type: VariantType,
    pub price_in_cents: u64,
    pub collector_number: Option<String>,
    pub image_url: Option<String>,
}

impl CardVariant {
    /// Build a variant, deriving the normalized name from `name`.
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        set_code: impl Into<String>,
        variant_type: VariantType,
        price_in_cents: u64,
    ) -> Self {
        let name_original = name.into();
        Self {
            name_normalized: crate::normalize::normalize(&name_original),
            name_original,
            set_code: set_code.into(),
            sku: sku.into(),
            variant_type,
            price_in_cents,
            collector_number: None,
            image_url: None,
        }
    }

    pub fn with_collector_number(mut self, number: impl Into<String>) -> Self {
        self.collector_number = Some(number.into());
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Price in dollars, for display only.
    pub fn price_dollars(&self) -> f64 {
        self.price_in_cents as f64 / 100.0
    }
}

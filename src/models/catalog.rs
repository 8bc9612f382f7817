use std::collections::{HashMap, HashSet};

use super::variant::CardVariant;

// ---------------------------------------------------------------------------
// Catalog: ordered variants plus a normalized-name index
// ---------------------------------------------------------------------------

/// The full set of purchasable variants.
///
/// A catalog is rebuilt wholesale on every ingestion. The index maps each
/// normalized name to the positions of its variants, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    variants: Vec<CardVariant>,
    index: HashMap<String, Vec<usize>>,
}

impl Catalog {
    pub fn new(variants: Vec<CardVariant>) -> Self {
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, v) in variants.iter().enumerate() {
            index.entry(v.name_normalized.clone()).or_default().push(i);
        }
        Self { variants, index }
    }

    pub fn variants(&self) -> &[CardVariant] {
        &self.variants
    }

    pub fn into_variants(self) -> Vec<CardVariant> {
        self.variants
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// All variants whose normalized name equals `normalized`.
    pub fn lookup_normalized(&self, normalized: &str) -> Vec<&CardVariant> {
        self.index
            .get(normalized)
            .map(|ids| ids.iter().map(|&i| &self.variants[i]).collect())
            .unwrap_or_default()
    }

    pub fn find_by_sku(&self, sku: &str) -> Option<&CardVariant> {
        self.variants.iter().find(|v| v.sku == sku)
    }

    /// Distinct set codes in first-seen order.
    pub fn set_codes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.variants
            .iter()
            .filter(|v| seen.insert(v.set_code.as_str()))
            .map(|v| v.set_code.as_str())
            .collect()
    }

    /// Return a new catalog with image URLs filled in from `urls` (keyed by SKU).
    ///
    /// Variants without an entry keep their current image URL.
    pub fn with_image_urls(&self, urls: &HashMap<String, String>) -> Catalog {
        let variants = self
            .variants
            .iter()
            .map(|v| match urls.get(&v.sku) {
                Some(url) => v.clone().with_image_url(url.clone()),
                None => v.clone(),
            })
            .collect();
        Catalog::new(variants)
    }
}

impl From<Vec<CardVariant>> for Catalog {
    fn from(variants: Vec<CardVariant>) -> Self {
        Catalog::new(variants)
    }
}

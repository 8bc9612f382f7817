//! Catalog ingestion from raw CSV and HTML exports.
//!
//! Upstream exports are untrusted and vary in shape, so every parser here is
//! failure-tolerant: malformed rows are dropped, a missing header yields an
//! empty [`Catalog`], and nothing returns an error.
//!
//! All three input shapes (CSV rows, HTML card blocks, HTML table rows) are
//! reduced to a [`RawRow`] and then go through the same [`build_variant`]
//! pipeline: name post-processing, variant canonicalization, price
//! resolution, and row rejection.

pub mod csv;
pub mod embedded;
pub mod html;

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::config;
use crate::models::{CardVariant, Catalog, VariantType};

pub use self::csv::parse as parse_csv;
pub use self::html::parse as parse_html;

/// Caller-supplied dollar price per card type name (e.g. `"Foil" -> 3.5`).
pub type TypePriceMap = HashMap<String, f64>;

pub(crate) static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("Invalid tag regex"));

static SET_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*\S)\s+([A-Za-z0-9]{2,5})$").expect("Invalid set suffix regex")
});

static COLLECTOR_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*\S)\s+#([A-Za-z0-9]+)$").expect("Invalid collector suffix regex")
});

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

/// Map a lowercased, trimmed header cell to the field it names.
fn field_for_header(header: &str) -> Option<Field> {
    match header {
        "card name" | "name" => Some(Field::Name),
        "sku" => Some(Field::Sku),
        "set" => Some(Field::Set),
        "card type" | "type" => Some(Field::Type),
        "base price" | "price" => Some(Field::Price),
        "collector number" | "collector" | "number" => Some(Field::CollectorNumber),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    Sku,
    Name,
    Set,
    Type,
    Price,
    CollectorNumber,
}

/// Column positions resolved from a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub sku: usize,
    pub name: usize,
    pub set: usize,
    pub card_type: usize,
    pub price: Option<usize>,
    pub collector_number: Option<usize>,
}

impl ColumnMap {
    /// Resolve header cells through the alias table.
    ///
    /// Cells are lowercased and trimmed here. The first column carrying an
    /// alias wins. Returns `None` when sku, name, set or type is missing.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Option<Self> {
        let mut found: HashMap<Field, usize> = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            if let Some(field) = field_for_header(header.as_ref().trim().to_lowercase().as_str()) {
                found.entry(field).or_insert(i);
            }
        }

        Some(Self {
            sku: *found.get(&Field::Sku)?,
            name: *found.get(&Field::Name)?,
            set: *found.get(&Field::Set)?,
            card_type: *found.get(&Field::Type)?,
            price: found.get(&Field::Price).copied(),
            collector_number: found.get(&Field::CollectorNumber).copied(),
        })
    }

    /// Pull a [`RawRow`] out of already-sanitized cells.
    pub fn extract(&self, cells: &[String]) -> RawRow {
        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        RawRow {
            sku: cell(self.sku),
            name: cell(self.name),
            set: cell(self.set),
            card_type: cell(self.card_type),
            price: self.price.and_then(|i| cells.get(i).cloned()),
            collector_number: self
                .collector_number
                .and_then(|i| cells.get(i).cloned())
                .filter(|c| !c.is_empty()),
        }
    }
}

// ---------------------------------------------------------------------------
// RawRow to CardVariant
// ---------------------------------------------------------------------------

/// One catalog row before post-processing, as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub sku: String,
    pub name: String,
    pub set: String,
    pub card_type: String,
    pub price: Option<String>,
    pub collector_number: Option<String>,
}

/// Run the shared post-processing pipeline over one row.
///
/// Returns `None` when sku, name or set is still blank afterwards.
pub fn build_variant(row: RawRow, type_prices: &TypePriceMap) -> Option<CardVariant> {
    let RawRow {
        sku,
        mut name,
        mut set,
        card_type,
        price,
        mut collector_number,
    } = row;

    if let Some(caps) = COLLECTOR_SUFFIX_RE.captures(&name) {
        let number = caps[2].to_string();
        name = caps[1].to_string();
        if collector_number.is_none() {
            collector_number = Some(number);
        }
    }

    if let Some(caps) = SET_SUFFIX_RE.captures(&name) {
        let token = &caps[2];
        if looks_like_set_code(token) && (set.is_empty() || set.eq_ignore_ascii_case(token)) {
            set = token.to_string();
            name = caps[1].to_string();
        }
    }

    let sku = sku.trim().to_string();
    let name = name.trim().to_string();
    let set = set.trim().to_string();
    if sku.is_empty() || name.is_empty() || set.is_empty() {
        return None;
    }

    let variant_type = VariantType::canonicalize(&card_type);
    let cents = resolve_price_cents(price.as_deref(), variant_type, type_prices);

    let mut variant = CardVariant::new(sku, name, set, variant_type, cents);
    variant.collector_number = collector_number;
    Some(variant)
}

/// Set-code shape: 2-5 uppercase alphanumerics with at least one letter.
pub fn looks_like_set_code(token: &str) -> bool {
    (2..=5).contains(&token.len())
        && token
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        && token.chars().any(|c| c.is_ascii_uppercase())
}

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

/// Resolve a price cell to integer cents.
///
/// Non `[0-9.]` characters are stripped before parsing. A missing, unparsable,
/// zero or out-of-range price falls back to `type_prices`, then to the fixed
/// defaults.
pub fn resolve_price_cents(
    cell: Option<&str>,
    variant: VariantType,
    type_prices: &TypePriceMap,
) -> u64 {
    let parsed = cell
        .map(|c| {
            c.chars()
                .filter(|ch| ch.is_ascii_digit() || *ch == '.')
                .collect::<String>()
        })
        .and_then(|digits| digits.parse::<f64>().ok())
        .filter(|d| is_usable_price(*d));

    let dollars = parsed
        .or_else(|| type_price(type_prices, variant))
        .unwrap_or_else(|| config::default_price_dollars(variant));

    dollars_to_cents(dollars)
}

/// Dollars to cents, rounding half away from zero. Non-finite or negative
/// amounts become 0 and the result is capped at [`config::MAX_PRICE_DOLLARS`].
pub fn dollars_to_cents(dollars: f64) -> u64 {
    if !dollars.is_finite() {
        return 0;
    }
    (dollars.clamp(0.0, config::MAX_PRICE_DOLLARS) * 100.0).round() as u64
}

fn is_usable_price(dollars: f64) -> bool {
    dollars.is_finite() && dollars > 0.0 && dollars <= config::MAX_PRICE_DOLLARS
}

/// Look up a type price by exact key, then case-insensitive key, then by
/// canonicalizing each key. Non-positive, non-finite and out-of-range prices
/// are ignored.
fn type_price(type_prices: &TypePriceMap, variant: VariantType) -> Option<f64> {
    let name = variant.as_str();
    type_prices
        .get(name)
        .copied()
        .or_else(|| {
            type_prices
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| *v)
        })
        .or_else(|| {
            let mut keys: Vec<&String> = type_prices
                .keys()
                .filter(|k| VariantType::canonicalize(k) == variant)
                .collect();
            keys.sort();
            keys.first().and_then(|k| type_prices.get(*k)).copied()
        })
        .filter(|p| is_usable_price(*p))
}

/// Replace any zero price with the fixed default for the variant's type.
pub fn backfill_prices(catalog: Catalog) -> Catalog {
    let mut backfilled = 0usize;
    let variants: Vec<CardVariant> = catalog
        .into_variants()
        .into_iter()
        .map(|mut v| {
            if v.price_in_cents == 0 {
                v.price_in_cents = config::default_price_cents(v.variant_type);
                backfilled += 1;
            }
            v
        })
        .collect();
    if backfilled > 0 {
        log::debug!("Backfilled default prices for {} variants", backfilled);
    }
    Catalog::new(variants)
}

// ---------------------------------------------------------------------------
// Cell sanitizing
// ---------------------------------------------------------------------------

/// Strip HTML tags, decode `&nbsp;`/`&amp;`, collapse whitespace, trim.
pub fn sanitize_cell(raw: &str) -> String {
    let stripped = TAG_RE.replace_all(raw, "");
    let decoded = stripped.replace("&nbsp;", " ").replace("&amp;", "&");
    collapse_whitespace(&decoded)
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Entry points over unknown input
// ---------------------------------------------------------------------------

/// Parse `text` as CSV, falling back to the HTML parser when that yields nothing.
pub fn parse_auto(text: &str, type_prices: &TypePriceMap) -> Catalog {
    let catalog = csv::parse(text, type_prices);
    if !catalog.is_empty() {
        return catalog;
    }
    log::debug!("No usable CSV data, trying HTML fallback");
    html::parse(text, type_prices)
}

/// Parse a full HTML page the way a remote catalog page is handled.
///
/// An embedded `CARD_TYPE_PRICES` map overrides `type_prices`; an embedded
/// `EXAMPLE_CSV` block is tried before the structured HTML parsers. Zero
/// prices are backfilled.
pub fn parse_html_page(html_text: &str, type_prices: &TypePriceMap) -> Catalog {
    let prices = embedded::merged_type_prices(html_text, type_prices);

    if let Some(csv_block) = embedded::extract_example_csv(html_text) {
        let catalog = csv::parse(&csv_block, &prices);
        if !catalog.is_empty() {
            return backfill_prices(catalog);
        }
    }

    backfill_prices(html::parse(html_text, &prices))
}

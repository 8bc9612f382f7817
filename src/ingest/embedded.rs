//! Data embedded in a catalog page's inline JavaScript.

use std::sync::LazyLock;

use regex::Regex;

use super::TypePriceMap;

static TYPE_PRICES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"CARD_TYPE_PRICES\s*=\s*\{([^}]*)\}").expect("Invalid type prices regex")
});

static EXAMPLE_CSV_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)EXAMPLE_CSV\s*=\s*`([^`]*)`").expect("Invalid example CSV regex")
});

/// Extract a `CARD_TYPE_PRICES = { "Type": price, ... }` object literal.
///
/// Pairs that do not parse are skipped. Returns `None` when the pattern is
/// absent or no pair survives.
pub fn extract_type_prices(html: &str) -> Option<TypePriceMap> {
    let body = TYPE_PRICES_RE.captures(html)?.get(1)?.as_str();

    let prices: TypePriceMap = body
        .split(',')
        .filter_map(|pair| {
            let (key, value) = pair.split_once(':')?;
            let key = key.trim().trim_matches(|c| c == '"' || c == '\'').trim();
            let value = value.trim().parse::<f64>().ok()?;
            (!key.is_empty()).then(|| (key.to_string(), value))
        })
        .collect();

    (!prices.is_empty()).then_some(prices)
}

/// Extract the backtick-delimited `EXAMPLE_CSV = `...`` block.
pub fn extract_example_csv(html: &str) -> Option<String> {
    let block = EXAMPLE_CSV_RE.captures(html)?.get(1)?.as_str().trim();
    (!block.is_empty()).then(|| block.to_string())
}

/// Caller prices overlaid with any embedded `CARD_TYPE_PRICES` entries.
pub fn merged_type_prices(html: &str, base: &TypePriceMap) -> TypePriceMap {
    let mut merged = base.clone();
    if let Some(embedded) = extract_type_prices(html) {
        log::debug!("Found embedded type prices: {:?}", embedded);
        merged.extend(embedded);
    }
    merged
}

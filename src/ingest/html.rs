//! HTML fallback parsers: labeled card blocks and the largest `<table>`.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::{build_variant, sanitize_cell, ColumnMap, RawRow, TypePriceMap, TAG_RE};
use crate::models::{CardVariant, Catalog, VariantType};

static TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<table\b.*?</table>").expect("Invalid table regex"));

static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr\b.*?</tr>").expect("Invalid row regex"));

static CELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<t[hd]\b[^>]*>(.*?)</t[hd]>").expect("Invalid cell regex")
});

const SKU_LABEL: &str = "SKU:";
const NAME_LABEL: &str = "Card Name:";
const SET_LABEL: &str = "Set:";
const TYPE_LABEL: &str = "Card Type:";
const PRICE_LABEL: &str = "Base Price:";
const LABELS: &[&str] = &[SKU_LABEL, NAME_LABEL, SET_LABEL, TYPE_LABEL, PRICE_LABEL];

/// Parse an HTML catalog page.
///
/// Labeled card blocks are tried first, then the largest table. Duplicate
/// `(normalized name, set, type)` entries collapse to the lowest non-zero price.
pub fn parse(html: &str, type_prices: &TypePriceMap) -> Catalog {
    let mut variants = parse_card_blocks(html, type_prices);
    if variants.is_empty() {
        variants = parse_largest_table(html, type_prices);
        log::debug!("HTML table ingestion: {} variants", variants.len());
    } else {
        log::debug!("HTML card block ingestion: {} variants", variants.len());
    }
    Catalog::new(dedupe_lowest_price(variants))
}

// ---------------------------------------------------------------------------
// Labeled card blocks
// ---------------------------------------------------------------------------

/// Parse repeated `SKU: / Card Name: / Set: / Card Type: / Base Price:` blocks.
pub fn parse_card_blocks(html: &str, type_prices: &TypePriceMap) -> Vec<CardVariant> {
    let text = html_to_text(html);

    let starts: Vec<usize> = text.match_indices(SKU_LABEL).map(|(i, _)| i).collect();
    let mut variants = Vec::new();

    for (n, &start) in starts.iter().enumerate() {
        let end = starts.get(n + 1).copied().unwrap_or(text.len());
        let block = &text[start..end];

        let row = RawRow {
            sku: label_value(block, SKU_LABEL).unwrap_or_default(),
            name: label_value(block, NAME_LABEL).unwrap_or_default(),
            set: label_value(block, SET_LABEL).unwrap_or_default(),
            card_type: label_value(block, TYPE_LABEL).unwrap_or_default(),
            price: label_value(block, PRICE_LABEL),
            collector_number: None,
        };
        if let Some(variant) = build_variant(row, type_prices) {
            variants.push(variant);
        }
    }

    variants
}

/// Tags become line breaks so each label's value ends at its element boundary.
fn html_to_text(html: &str) -> String {
    let text = TAG_RE.replace_all(html, "\n");
    text.replace("&nbsp;", " ").replace("&amp;", "&").replace('\r', "")
}

/// Text immediately following `label`, up to the end of that line.
///
/// Leading whitespace (including line breaks left by closing tags) is skipped.
fn label_value(block: &str, label: &str) -> Option<String> {
    let at = block.find(label)?;
    let rest = block[at + label.len()..].trim_start();
    let value = rest.lines().next().unwrap_or("").trim();
    // an empty field leaves the next label as the first text after this one
    if value.is_empty() || LABELS.iter().any(|l| value.starts_with(l)) {
        return None;
    }
    Some(sanitize_cell(value))
}

// ---------------------------------------------------------------------------
// Largest table
// ---------------------------------------------------------------------------

/// Parse the `<table>` with the most rows, alias-mapping its first row.
///
/// Rows with fewer cells than the header are dropped.
pub fn parse_largest_table(html: &str, type_prices: &TypePriceMap) -> Vec<CardVariant> {
    let mut largest: Option<Vec<Vec<String>>> = None;
    for table in TABLE_RE.find_iter(html) {
        let rows = table_rows(table.as_str());
        if largest.as_ref().map_or(true, |l| rows.len() > l.len()) {
            largest = Some(rows);
        }
    }

    let Some(rows) = largest else {
        return Vec::new();
    };
    let Some((headers, body)) = rows.split_first() else {
        return Vec::new();
    };
    let Some(columns) = ColumnMap::resolve(headers.as_slice()) else {
        log::debug!("HTML table header missing required columns: {:?}", headers);
        return Vec::new();
    };

    body.iter()
        .filter(|cells| cells.len() >= headers.len())
        .filter_map(|cells| build_variant(columns.extract(cells), type_prices))
        .collect()
}

fn table_rows(table: &str) -> Vec<Vec<String>> {
    ROW_RE
        .find_iter(table)
        .map(|row| {
            CELL_RE
                .captures_iter(row.as_str())
                .map(|c| sanitize_cell(&c[1]))
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// De-duplication
// ---------------------------------------------------------------------------

/// Collapse duplicate `(normalized name, set, type)` triples.
///
/// The surviving entry keeps the first occurrence's position and carries the
/// lowest non-zero price seen.
pub fn dedupe_lowest_price(variants: Vec<CardVariant>) -> Vec<CardVariant> {
    let mut positions: HashMap<(String, String, VariantType), usize> = HashMap::new();
    let mut out: Vec<CardVariant> = Vec::with_capacity(variants.len());

    for variant in variants {
        let key = (
            variant.name_normalized.clone(),
            variant.set_code.clone(),
            variant.variant_type,
        );
        match positions.get(&key) {
            Some(&i) => {
                let kept = &out[i];
                let cheaper = variant.price_in_cents > 0
                    && (kept.price_in_cents == 0 || variant.price_in_cents < kept.price_in_cents);
                if cheaper {
                    out[i] = variant;
                }
            }
            None => {
                positions.insert(key, out.len());
                out.push(variant);
            }
        }
    }

    out
}

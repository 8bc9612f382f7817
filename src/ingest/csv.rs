//! CSV catalog parsing with repair heuristics for malformed exports.

use std::sync::LazyLock;

use regex::Regex;

use super::{build_variant, looks_like_set_code, sanitize_cell};
use super::{ColumnMap, TypePriceMap};
use crate::models::{Catalog, VariantType};

/// A `SKU<digits>,` row-start token glued to whatever precedes it. Covers the
/// header/row boundary too, where `Card Type` runs straight into the first SKU.
static ROW_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\n])[ \t]*(SKU\d+,)").expect("Invalid row start regex"));

/// Parse a CSV catalog export.
///
/// Returns an empty catalog when the header lacks any of sku, name, set, type.
pub fn parse(raw: &str, type_prices: &TypePriceMap) -> Catalog {
    let text = preprocess(raw);
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Catalog::default();
    };
    let headers = split_row(header_line);
    let Some(columns) = ColumnMap::resolve(headers.as_slice()) else {
        log::debug!("CSV header missing required columns: {:?}", headers);
        return Catalog::default();
    };

    let mut variants = Vec::new();
    let mut dropped = 0usize;

    for line in lines {
        let raw_cells = split_row(line);
        let mut cells: Vec<String> = raw_cells.iter().map(|c| sanitize_cell(c)).collect();

        if cells.len() > headers.len() {
            if let Some(fixed) = realign_row(&raw_cells, &cells, columns.name) {
                cells = fixed;
            }
        }

        match build_variant(columns.extract(&cells), type_prices) {
            Some(variant) => variants.push(variant),
            None => dropped += 1,
        }
    }

    log::debug!(
        "CSV ingestion: {} variants accepted, {} rows dropped",
        variants.len(),
        dropped
    );
    Catalog::new(variants)
}

/// Strip carriage returns and put every `SKU<digits>,` row start on its own line.
///
/// Some exports collapse every row onto a single line; this restores the row
/// boundaries without a real CSV re-parse. The repair only applies when the
/// SKU is the leading column, since elsewhere a `SKU<digits>,` token sits
/// mid-row and does not start one.
pub fn preprocess(raw: &str) -> String {
    let text = raw.replace('\r', "");
    if !sku_leads(&text) {
        return text;
    }
    ROW_START_RE.replace_all(&text, "${1}\n${2}").into_owned()
}

/// True when the first non-blank line opens with a `SKU` header cell or a
/// `SKU<digits>` value (a headerless page).
fn sku_leads(text: &str) -> bool {
    let Some(first) = text.lines().find(|l| !l.trim().is_empty()) else {
        return false;
    };
    let cell = first.split(',').next().unwrap_or_default();
    let cell = cell.trim().trim_matches('"').trim();
    cell.get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("sku"))
        && cell[3..].chars().all(|c| c.is_ascii_digit())
}

/// Quote-aware comma splitter.
///
/// `"` toggles quoted mode, `""` inside quotes is a literal quote, and `,`
/// outside quotes separates fields.
pub fn split_row(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => cells.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    cells.push(current);
    cells
}

/// Re-align a row whose unquoted name commas pushed later columns right.
///
/// Scans forward from the name column for a set-code cell followed by a
/// variant-type cell. Everything skipped over is joined back into the name.
/// Returns `None` when no such position exists; the caller then keeps the
/// row as-is, which may mis-parse.
pub fn realign_row(raw_cells: &[String], cells: &[String], name_idx: usize) -> Option<Vec<String>> {
    if name_idx >= cells.len() {
        return None;
    }

    let set_idx = (name_idx + 1..cells.len().saturating_sub(1))
        .find(|&j| looks_like_set_code(&cells[j]) && VariantType::is_token(&cells[j + 1]))?;

    let name = sanitize_cell(&raw_cells[name_idx..set_idx].join(","));

    let mut fixed = Vec::with_capacity(cells.len() - (set_idx - name_idx) + 1);
    fixed.extend_from_slice(&cells[..name_idx]);
    fixed.push(name);
    fixed.extend_from_slice(&cells[set_idx..]);
    Some(fixed)
}

use serde::{Deserialize, Serialize};

use super::deck::DeckEntry;
use super::resolution::DeckEntryMatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShippingMethod {
    Normal,
    Express,
}

// ---------------------------------------------------------------------------
// PriceBreakdown: discount, shipping and totals for a resolved order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base_total_cents: u64,
    pub discount_percent: u64,
    pub discount_amount_cents: u64,
    pub subtotal_after_discount_cents: u64,
    pub shipping_method: ShippingMethod,
    pub shipping_cost_cents: u64,
    pub grand_total_cents: u64,
    /// Entries that contributed (had a selected variant).
    pub line_count: usize,
    /// Sum of quantities over contributing entries.
    pub card_count: u64,
}

// ---------------------------------------------------------------------------
// Quote: the whole parse, match and price pipeline result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub entries: Vec<DeckEntry>,
    pub matches: Vec<DeckEntryMatch>,
    pub breakdown: PriceBreakdown,
}

//! Order totals: tiered discount, then shipping on the discounted subtotal.

use crate::config;
use crate::models::{DeckEntryMatch, PriceBreakdown, ShippingMethod};

/// Price every match that has a selected variant.
///
/// Unselected entries (excluded, not found, ambiguous) contribute nothing.
/// Totals saturate rather than overflow.
pub fn calculate(matches: &[DeckEntryMatch]) -> PriceBreakdown {
    let contributing: Vec<&DeckEntryMatch> = matches.iter().filter(|m| m.is_resolved()).collect();

    let base_total_cents = contributing
        .iter()
        .fold(0u64, |acc, m| acc.saturating_add(m.line_total_cents()));
    let card_count = contributing
        .iter()
        .fold(0u64, |acc, m| acc.saturating_add(u64::from(m.deck_entry.qty)));

    let discount_percent = discount_percent(base_total_cents);
    let discount_amount_cents = discount_amount(base_total_cents, discount_percent);
    let subtotal_after_discount_cents = base_total_cents - discount_amount_cents;

    let (shipping_method, shipping_cost_cents) = shipping(subtotal_after_discount_cents);

    PriceBreakdown {
        base_total_cents,
        discount_percent,
        discount_amount_cents,
        subtotal_after_discount_cents,
        shipping_method,
        shipping_cost_cents,
        grand_total_cents: subtotal_after_discount_cents.saturating_add(shipping_cost_cents),
        line_count: contributing.len(),
        card_count,
    }
}

/// Discount percent for a base total; thresholds are strict greater-than.
pub fn discount_percent(base_total_cents: u64) -> u64 {
    config::DISCOUNT_TIERS
        .iter()
        .find(|(threshold, _)| base_total_cents > *threshold)
        .map(|(_, percent)| *percent)
        .unwrap_or(0)
}

/// Floor of `percent`% of `base_cents`, computed without overflow.
pub fn discount_amount(base_cents: u64, percent: u64) -> u64 {
    let amount = u128::from(base_cents) * u128::from(percent.min(100)) / 100;
    u64::try_from(amount).unwrap_or(u64::MAX)
}

/// Shipping method and cost for a discounted subtotal.
pub fn shipping(subtotal_cents: u64) -> (ShippingMethod, u64) {
    if subtotal_cents > config::EXPRESS_SHIPPING_THRESHOLD_CENTS {
        (ShippingMethod::Express, 0)
    } else if subtotal_cents > config::FREE_SHIPPING_THRESHOLD_CENTS {
        (ShippingMethod::Normal, 0)
    } else {
        (ShippingMethod::Normal, config::STANDARD_SHIPPING_CENTS)
    }
}

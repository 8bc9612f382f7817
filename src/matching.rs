//! Resolve decklist entries against a catalog.
//!
//! Names are tried through a ladder of tiers, stopping at the first tier that
//! finds anything:
//!
//! 1. `exact` -- case-sensitive equality with the catalog name
//! 2. `ci` -- case-insensitive equality
//! 3. `normalized` -- equality of [`normalize`]d names
//! 4. `lev:N` -- Levenshtein distance on normalized names (if fuzzy is enabled)
//!
//! A hit in tiers 1-3 is always auto-selected: several candidates are ranked
//! by the user's set and variant priorities and the first one wins. Fuzzy hits
//! are never selected; they come back as `Ambiguous` for the user to pick.

use crate::config;
use crate::models::{
    CardVariant, Catalog, DeckEntry, DeckEntryMatch, MatchCandidate, MatchStatus, Preferences,
};
use crate::normalize::{levenshtein, normalize};

pub const TIER_EXACT: &str = "exact";
pub const TIER_CASE_INSENSITIVE: &str = "ci";
pub const TIER_NORMALIZED: &str = "normalized";

const EXCLUDED_NOTE: &str = "Excluded";
const NOT_FOUND_NOTE: &str = "No match";

// ---------------------------------------------------------------------------
// MatchingEngine
// ---------------------------------------------------------------------------

/// Matches entries using the priorities and fuzzy switch of a [`Preferences`].
pub struct MatchingEngine<'a> {
    prefs: &'a Preferences,
}

impl<'a> MatchingEngine<'a> {
    pub fn new(prefs: &'a Preferences) -> Self {
        Self { prefs }
    }

    /// One result per entry, in input order.
    pub fn match_all(&self, entries: &[DeckEntry], catalog: &Catalog) -> Vec<DeckEntryMatch> {
        entries
            .iter()
            .map(|entry| self.match_entry(entry, catalog))
            .collect()
    }

    pub fn match_entry(&self, entry: &DeckEntry, catalog: &Catalog) -> DeckEntryMatch {
        if !entry.include {
            return DeckEntryMatch::unresolved(entry.clone(), EXCLUDED_NOTE);
        }

        let in_hinted_set = |v: &CardVariant| match &entry.set_code_hint {
            Some(hint) => v.set_code.eq_ignore_ascii_case(hint),
            None => true,
        };
        let pool: Vec<&CardVariant> = catalog
            .variants()
            .iter()
            .filter(|v| in_hinted_set(*v))
            .collect();

        let exact: Vec<&CardVariant> = pool
            .iter()
            .copied()
            .filter(|v| v.name_original == entry.card_name)
            .collect();
        if !exact.is_empty() {
            return self.select_by_priority(entry, exact, TIER_EXACT);
        }

        let lowered = entry.card_name.to_lowercase();
        let case_insensitive: Vec<&CardVariant> = pool
            .iter()
            .copied()
            .filter(|v| v.name_original.to_lowercase() == lowered)
            .collect();
        if !case_insensitive.is_empty() {
            return self.select_by_priority(entry, case_insensitive, TIER_CASE_INSENSITIVE);
        }

        let normalized = normalize(&entry.card_name);
        let by_normalized: Vec<&CardVariant> = catalog
            .lookup_normalized(&normalized)
            .into_iter()
            .filter(|v| in_hinted_set(*v))
            .collect();
        if !by_normalized.is_empty() {
            return self.select_by_priority(entry, by_normalized, TIER_NORMALIZED);
        }

        if self.prefs.fuzzy_enabled {
            if let Some(result) = fuzzy_match(entry, &normalized, &pool) {
                return result;
            }
        }

        log::debug!("No catalog match for {:?}", entry.card_name);
        DeckEntryMatch::not_found(entry.clone(), NOT_FOUND_NOTE)
    }

    /// Rank a tier's candidates and select the first.
    ///
    /// Candidates are narrowed to the set hint when present, then stably
    /// sorted by set priority and then by variant priority, so variant
    /// priority decides first and set priority breaks its ties. Unlisted
    /// codes and types rank last. `found` must not be empty.
    fn select_by_priority(
        &self,
        entry: &DeckEntry,
        found: Vec<&CardVariant>,
        reason: &str,
    ) -> DeckEntryMatch {
        let mut ranked = found;
        if let Some(hint) = &entry.set_code_hint {
            let narrowed: Vec<&CardVariant> = ranked
                .iter()
                .copied()
                .filter(|v| v.set_code.eq_ignore_ascii_case(hint))
                .collect();
            if !narrowed.is_empty() {
                ranked = narrowed;
            }
        }

        ranked.sort_by_key(|v| self.prefs.set_rank(&v.set_code));
        ranked.sort_by_key(|v| self.prefs.variant_rank(v.variant_type.as_str()));

        let selected = ranked[0].clone();
        let notes = if ranked.len() == 1 {
            format!("Matched ({})", reason)
        } else {
            format!(
                "{} candidates ({}); selected by priority",
                ranked.len(),
                reason
            )
        };
        log::debug!(
            "{:?} -> {} [{}] via {}",
            entry.card_name,
            selected.sku,
            selected.set_code,
            reason
        );

        DeckEntryMatch {
            deck_entry: entry.clone(),
            status: MatchStatus::AutoMatched,
            selected_variant: Some(selected),
            candidates: ranked
                .into_iter()
                .map(|v| MatchCandidate {
                    variant: v.clone(),
                    score: 0,
                    reason: reason.to_string(),
                })
                .collect(),
            notes,
        }
    }
}

/// Match every entry with the given preferences.
pub fn match_all(
    entries: &[DeckEntry],
    catalog: &Catalog,
    prefs: &Preferences,
) -> Vec<DeckEntryMatch> {
    MatchingEngine::new(prefs).match_all(entries, catalog)
}

// ---------------------------------------------------------------------------
// Fuzzy tier
// ---------------------------------------------------------------------------

/// Maximum edit distance accepted for a normalized name of `len` characters.
pub fn fuzzy_threshold(len: usize) -> usize {
    if len <= config::FUZZY_SHORT_NAME_LEN {
        config::FUZZY_SHORT_THRESHOLD
    } else {
        config::FUZZY_LONG_THRESHOLD
    }
}

/// Candidates within the edit-distance threshold, nearest and then cheapest
/// first. Always `Ambiguous`; `None` when nothing is close enough.
fn fuzzy_match(
    entry: &DeckEntry,
    normalized: &str,
    pool: &[&CardVariant],
) -> Option<DeckEntryMatch> {
    // an empty name would be "close" to every short name
    if normalized.is_empty() {
        return None;
    }
    let threshold = fuzzy_threshold(normalized.chars().count());

    let mut scored: Vec<(usize, &CardVariant)> = pool
        .iter()
        .filter_map(|v| {
            let distance = levenshtein(normalized, &v.name_normalized);
            (distance <= threshold).then_some((distance, *v))
        })
        .collect();
    if scored.is_empty() {
        return None;
    }
    scored.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.1.price_in_cents.cmp(&b.1.price_in_cents))
    });

    log::debug!(
        "{:?}: {} fuzzy candidates within distance {}",
        entry.card_name,
        scored.len(),
        threshold
    );

    Some(DeckEntryMatch {
        deck_entry: entry.clone(),
        status: MatchStatus::Ambiguous,
        selected_variant: None,
        notes: format!("{} similar names; choose one", scored.len()),
        candidates: scored
            .into_iter()
            .map(|(distance, v)| MatchCandidate {
                variant: v.clone(),
                score: distance,
                reason: format!("lev:{}", distance),
            })
            .collect(),
    })
}

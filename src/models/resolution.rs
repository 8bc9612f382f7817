use serde::{Deserialize, Serialize};

use super::deck::DeckEntry;
use super::variant::CardVariant;

// ---------------------------------------------------------------------------
// MatchStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Entry was excluded from matching (`include == false`).
    Unresolved,
    AutoMatched,
    /// Fuzzy candidates exist but none was selected.
    Ambiguous,
    NotFound,
    ManualSelected,
}

// ---------------------------------------------------------------------------
// MatchCandidate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    pub variant: CardVariant,
    /// 0 for the exact/ci/normalized tiers, edit distance for fuzzy.
    pub score: usize,
    /// Tier tag: `"exact"`, `"ci"`, `"normalized"` or `"lev:N"`.
    pub reason: String,
}

// ---------------------------------------------------------------------------
// DeckEntryMatch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckEntryMatch {
    pub deck_entry: DeckEntry,
    pub status: MatchStatus,
    pub selected_variant: Option<CardVariant>,
    pub candidates: Vec<MatchCandidate>,
    pub notes: String,
}

impl DeckEntryMatch {
    pub(crate) fn unresolved(deck_entry: DeckEntry, notes: &str) -> Self {
        Self {
            deck_entry,
            status: MatchStatus::Unresolved,
            selected_variant: None,
            candidates: Vec::new(),
            notes: notes.to_string(),
        }
    }

    pub(crate) fn not_found(deck_entry: DeckEntry, notes: &str) -> Self {
        Self {
            deck_entry,
            status: MatchStatus::NotFound,
            selected_variant: None,
            candidates: Vec::new(),
            notes: notes.to_string(),
        }
    }

    /// True when a variant is selected (auto or manual).
    pub fn is_resolved(&self) -> bool {
        self.selected_variant.is_some()
    }

    /// Record a user's choice, overriding whatever the engine decided.
    pub fn select_manually(&mut self, variant: CardVariant) {
        self.status = MatchStatus::ManualSelected;
        self.selected_variant = Some(variant);
    }

    /// Line total in cents for the selected variant, or 0.
    pub fn line_total_cents(&self) -> u64 {
        self.selected_variant
            .as_ref()
            .map(|v| v.price_in_cents.saturating_mul(u64::from(self.deck_entry.qty)))
            .unwrap_or(0)
    }
}

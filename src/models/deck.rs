use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Section: which part of the decklist an entry came from
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Main,
    Sideboard,
    Commander,
}

// ---------------------------------------------------------------------------
// DeckEntry: one parsed decklist line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckEntry {
    pub original_line: String,
    pub qty: u32,
    pub card_name: String,
    pub section: Section,
    /// Whether the entry takes part in matching and pricing.
    pub include: bool,
    pub set_code_hint: Option<String>,
    pub collector_number_hint: Option<String>,
    /// Raw content of the trailing parenthetical, whatever it held.
    pub raw_set_hint: Option<String>,
}

impl DeckEntry {
    /// A bare main-deck entry with no hints.
    pub fn new(qty: u32, card_name: impl Into<String>) -> Self {
        let card_name = card_name.into();
        Self {
            original_line: format!("{} {}", qty, card_name),
            qty,
            card_name,
            section: Section::Main,
            include: true,
            set_code_hint: None,
            collector_number_hint: None,
            raw_set_hint: None,
        }
    }

    pub fn with_set_hint(mut self, set_code: impl Into<String>) -> Self {
        self.set_code_hint = Some(set_code.into());
        self
    }
}

//! Free-text decklist parsing.
//!
//! Accepts the common export shape `<qty> <card name>[ (SET[ NUM])][ - note]`
//! with a `SIDEBOARD:` marker line. A blank line after the sideboard starts
//! the commander section. Lines that do not start with a quantity are skipped.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{DeckEntry, Section};

static CARD_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(SB:\s*)?(\d+)[xX]?\s+(.+)$").expect("Invalid card line regex")
});

/// A parenthetical group, plus whatever follows it on the line.
static PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]*)\)([^()]*)$").expect("Invalid parenthetical regex"));

static SET_AND_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9]{2,5})[ -](\d+[A-Za-z]?)$").expect("Invalid set/number regex")
});

static BARE_SET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{2,5}$").expect("Invalid bare set regex"));

const SIDEBOARD_MARKER: &str = "SIDEBOARD:";
const NOTE_SEPARATOR: &str = " - ";

/// Parse decklist text into entries, preserving input order.
///
/// Main-deck entries are always included. Sideboard and commander entries are
/// still produced when excluded, with `include` set from the matching flag.
pub fn parse(text: &str, include_sideboard: bool, include_commanders: bool) -> Vec<DeckEntry> {
    let lines: Vec<&str> = text.lines().map(|l| l.trim()).collect();
    let last_content = lines.iter().rposition(|l| !l.is_empty());
    let mut section = Section::Main;
    let mut entries = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            let more_follows = last_content.is_some_and(|last| last > i);
            if section == Section::Sideboard && more_follows {
                section = Section::Commander;
            }
            continue;
        }

        if line.eq_ignore_ascii_case(SIDEBOARD_MARKER) {
            section = Section::Sideboard;
            continue;
        }

        let Some(mut entry) = parse_line(line) else {
            log::debug!("Skipping decklist line without quantity: {:?}", line);
            continue;
        };

        // an `SB:` prefix marks that one line as sideboard
        if entry.section == Section::Main {
            entry.section = section;
        }
        entry.include = match entry.section {
            Section::Main => true,
            Section::Sideboard => include_sideboard,
            Section::Commander => include_commanders,
        };
        entries.push(entry);
    }

    entries
}

/// Parse one trimmed card line, or `None` if it has no leading quantity.
///
/// The returned entry is in `Main` unless the line carries an `SB:` prefix.
pub fn parse_line(line: &str) -> Option<DeckEntry> {
    let caps = CARD_LINE_RE.captures(line)?;
    let qty: u32 = caps[2].parse().ok().filter(|q| *q > 0)?;
    let section = if caps.get(1).is_some() {
        Section::Sideboard
    } else {
        Section::Main
    };

    let mut rest = caps[3].trim().to_string();
    let mut set_code_hint = None;
    let mut collector_number_hint = None;
    let mut raw_set_hint = None;

    let hint = PAREN_RE.captures(&rest).and_then(|paren| {
        let trailing = paren[2].trim();
        if !(trailing.is_empty() || trailing.starts_with('-')) {
            return None;
        }
        let (whole, inner) = (paren.get(0)?, paren.get(1)?);
        Some((whole.start()..inner.end() + 1, inner.as_str().trim().to_string()))
    });

    if let Some((range, content)) = hint {
        if let Some(sn) = SET_AND_NUMBER_RE.captures(&content) {
            set_code_hint = Some(sn[1].to_uppercase());
            collector_number_hint = Some(sn[2].to_string());
        } else if BARE_SET_RE.is_match(&content) {
            set_code_hint = Some(content.to_uppercase());
        }
        raw_set_hint = Some(content);
        // keep any text after the group so a trailing note is still stripped
        rest.replace_range(range, "");
    }

    if let Some(at) = rest.find(NOTE_SEPARATOR) {
        rest.truncate(at);
    }

    let card_name = rest.split_whitespace().collect::<Vec<_>>().join(" ");
    if card_name.is_empty() {
        return None;
    }

    Some(DeckEntry {
        original_line: line.to_string(),
        qty,
        card_name,
        section,
        include: true,
        set_code_hint,
        collector_number_hint,
        raw_set_hint,
    })
}

//! Card name canonicalization and edit distance.
//!
//! Both ingestion and matching compare names through [`normalize`], so a
//! catalog entry and a decklist line agree on a name regardless of case,
//! punctuation, or which face of a double-faced card was written.

/// Separator between the faces of a double-faced or split card.
const FACE_SEPARATOR: &str = " // ";

/// Canonicalize a card name for equality comparisons.
///
/// Lowercases, drops apostrophes/backticks/commas, turns dashes into spaces,
/// drops double quotes, keeps only the first face of a `" // "` name, removes
/// everything outside `[a-z0-9 ]`, then collapses and trims whitespace.
///
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(name: &str) -> String {
    let lowered: String = name
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '\'' | '`' | ',' | '\u{2019}' | '"'))
        .map(|c| if is_dash(c) { ' ' } else { c })
        .collect();

    let front = lowered
        .split(FACE_SEPARATOR)
        .next()
        .unwrap_or(lowered.as_str());

    let kept: String = front
        .chars()
        .filter_map(|c| match c {
            'a'..='z' | '0'..='9' => Some(c),
            c if c.is_whitespace() => Some(' '),
            _ => None,
        })
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_dash(c: char) -> bool {
    matches!(
        c,
        '-' | '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2212}'
    )
}

/// Levenshtein edit distance over Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

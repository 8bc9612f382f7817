use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ---------------------------------------------------------------------------
// Preferences: user configuration for parsing and matching
// ---------------------------------------------------------------------------

/// User-declared priorities and section switches.
///
/// Serialized as camelCase JSON; fields missing from a file fall back to
/// [`Preferences::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Variant type names, most preferred first.
    pub variant_priority: Vec<String>,
    /// Set codes, most preferred first.
    pub set_priority: Vec<String>,
    pub fuzzy_enabled: bool,
    pub include_sideboard: bool,
    pub include_commanders: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            variant_priority: vec!["Regular".into(), "Holo".into(), "Foil".into()],
            set_priority: Vec::new(),
            fuzzy_enabled: true,
            include_sideboard: false,
            include_commanders: true,
        }
    }
}

impl Preferences {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load from `path`, or return defaults when the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Position of `set_code` in the set priority list (case-insensitive).
    pub fn set_rank(&self, set_code: &str) -> usize {
        rank(&self.set_priority, set_code)
    }

    /// Position of `variant` in the variant priority list (case-insensitive).
    pub fn variant_rank(&self, variant: &str) -> usize {
        rank(&self.variant_priority, variant)
    }
}

/// Unlisted values rank after every listed one.
fn rank(list: &[String], value: &str) -> usize {
    list.iter()
        .position(|item| item.eq_ignore_ascii_case(value))
        .unwrap_or(list.len())
}

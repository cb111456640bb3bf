//! Key → template lookup with `{placeholder}` substitution.
//!
//! Tables are flat JSON objects supplied by the host:
//!
//! ```json
//! { "game4_reps": "Repetitions: {reps}/{target}", "result_win": "Win" }
//! ```
//!
//! A missing key renders as the key itself, so an absent table degrades to
//! readable identifiers instead of failing.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("failed to read translation table: {0}")]
    Io(#[from] std::io::Error),

    #[error("translation table is not a flat string map: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default)]
pub struct Translator {
    table: HashMap<String, String>,
}

impl Translator {
    /// A translator with no entries: every key renders as itself.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_map(table: HashMap<String, String>) -> Self {
        Self { table }
    }

    pub fn from_json_str(json: &str) -> Result<Self, TranslationError> {
        Ok(Self {
            table: serde_json::from_str(json)?,
        })
    }

    pub fn load(path: &Path) -> Result<Self, TranslationError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Load `path` if it exists, else fall back to [`empty`](Self::empty).
    /// Unreadable or malformed tables are logged and ignored.
    pub fn load_or_empty(path: &Path) -> Self {
        if !path.exists() {
            return Self::empty();
        }
        match Self::load(path) {
            Ok(t) => {
                log::debug!("i18n: {} keys from {}", t.len(), path.display());
                t
            }
            Err(e) => {
                log::warn!("i18n: ignoring {}: {e}", path.display());
                Self::empty()
            }
        }
    }

    /// Render `key`, replacing every `{name}` with its value.
    pub fn tr(&self, key: &str, vars: &[(&str, &dyn std::fmt::Display)]) -> String {
        let mut out = self
            .table
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string());
        for (name, value) in vars {
            out = out.replace(&format!("{{{name}}}"), &value.to_string());
        }
        out
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

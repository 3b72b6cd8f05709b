//! Whole-document settings persistence.
//!
//! One JSON document holds everything the user can mutate at runtime: memo,
//! theme index, pinned/read link sets, sound flag, source list, and active
//! map. The contract is deliberately loose: load falls back to defaults on
//! any failure, save is best-effort and never surfaces an error. There is
//! no atomic write and no versioning; a corrupt file simply reads as the
//! default document on the next start.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sources::Source;

/// Placeholder shown until the user edits the memo.
pub const DEFAULT_MEMO: &str = "PRESS m TO EDIT MEMO...";

/// The persisted settings document.
///
/// `pinned`/`read` serialize as arrays for a stable, human-readable file;
/// in-memory callers use the set accessors. Every field carries a serde
/// default so a partial or hand-edited file still loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsDocument {
    pub memo: String,
    pub theme_idx: usize,
    pub pinned: Vec<String>,
    pub read: Vec<String>,
    pub sound: bool,
    pub sources: Vec<Source>,
    pub active_sources: HashMap<String, bool>,
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self {
            memo: DEFAULT_MEMO.to_string(),
            theme_idx: 0,
            pinned: Vec::new(),
            read: Vec::new(),
            sound: true,
            sources: Vec::new(),
            active_sources: HashMap::new(),
        }
    }
}

impl SettingsDocument {
    pub fn pinned_set(&self) -> HashSet<String> {
        self.pinned.iter().cloned().collect()
    }

    pub fn read_set(&self) -> HashSet<String> {
        self.read.iter().cloned().collect()
    }
}

/// Load the settings document from `path`.
///
/// Missing file, unreadable file, and unparseable content all yield the
/// default document. Nothing is surfaced to the user; the failure mode of
/// a broken settings file is a fresh deck.
pub fn load(path: &Path) -> SettingsDocument {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "No settings file, using defaults");
            return SettingsDocument::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Settings file unparseable, using defaults");
            SettingsDocument::default()
        }
    }
}

/// Overwrite `path` with the full document, pretty-printed with non-ASCII
/// text preserved as-is. Failures are logged and swallowed.
pub fn save(path: &Path, doc: &SettingsDocument) {
    let json = match serde_json::to_string_pretty(doc) {
        Ok(j) => j,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize settings");
            return;
        }
    };

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!(path = %parent.display(), error = %e, "Failed to create settings directory");
            return;
        }
    }

    if let Err(e) = std::fs::write(path, json) {
        tracing::warn!(path = %path.display(), error = %e, "Failed to write settings");
    }
}

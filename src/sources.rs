//! The source registry: an ordered list of named feed endpoints plus a
//! per-source enabled flag.
//!
//! Names double as map keys for the active flags and as the tag stamped
//! onto aggregated entries. A name absent from the active map is treated
//! as enabled; sources can be appended and toggled at runtime but never
//! removed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// A named feed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("Source name must not be empty")]
    EmptyName,
    #[error("Invalid source URL: {0}")]
    InvalidUrl(String),
}

/// Ordered source list + active map.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<Source>,
    active: HashMap<String, bool>,
}

impl SourceRegistry {
    /// The built-in sources a fresh deck starts with.
    pub fn defaults() -> Self {
        let sources = vec![
            Source {
                name: "Reuters".to_string(),
                url: "https://news.google.com/rss/search?q=source:Reuters&hl=ja&gl=JP&ceid=JP:ja"
                    .to_string(),
            },
            Source {
                name: "Bloomberg".to_string(),
                url: "https://news.google.com/rss/search?q=source:Bloomberg&hl=ja&gl=JP&ceid=JP:ja"
                    .to_string(),
            },
        ];
        let active = sources.iter().map(|s| (s.name.clone(), true)).collect();
        Self { sources, active }
    }

    /// Rebuild a registry from persisted parts. An empty source list falls
    /// back to the defaults; active flags are taken as-is (missing entries
    /// resolve to enabled on lookup).
    pub fn from_parts(sources: Vec<Source>, active: HashMap<String, bool>) -> Self {
        if sources.is_empty() {
            let mut registry = Self::defaults();
            registry.active.extend(active);
            return registry;
        }
        Self { sources, active }
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn active_map(&self) -> &HashMap<String, bool> {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Whether a source is enabled. Unknown names default to enabled,
    /// which also covers entries orphaned by a renamed source.
    pub fn is_active(&self, name: &str) -> bool {
        self.active.get(name).copied().unwrap_or(true)
    }

    /// Flip a source's enabled flag and return the new state.
    ///
    /// A name with no recorded flag counts as enabled, so its first toggle
    /// lands on disabled.
    pub fn toggle(&mut self, name: &str) -> bool {
        let flag = self.active.entry(name.to_string()).or_insert(true);
        *flag = !*flag;
        *flag
    }

    /// Toggle the source at a list position, returning its name and new
    /// state. `None` when the position is out of range.
    pub fn toggle_at(&mut self, index: usize) -> Option<(String, bool)> {
        let name = self.sources.get(index)?.name.clone();
        let state = self.toggle(&name);
        Some((name, state))
    }

    /// Append a custom source and enable it.
    pub fn add(&mut self, name: &str, url: &str) -> Result<(), SourceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SourceError::EmptyName);
        }

        let parsed = Url::parse(url).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(SourceError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        self.sources.push(Source {
            name: name.to_string(),
            url: url.to_string(),
        });
        self.active.insert(name.to_string(), true);
        Ok(())
    }
}

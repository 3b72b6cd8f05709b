//! Configuration file parser for ~/.config/newsdeck/config.toml.
//!
//! The config file is optional — a missing file yields `Config::default()`.
//! It carries the tuning that is not mutable from inside the deck: poll
//! intervals, the per-source entry limit, and the weather feed URL. The
//! user-mutable state lives in the settings document instead.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be
/// specified. Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feed aggregation interval in minutes.
    pub refresh_interval_minutes: u64,

    /// Market ticker poll interval in seconds.
    pub market_interval_secs: u64,

    /// Weather badge poll interval in minutes.
    pub weather_interval_minutes: u64,

    /// How many recent items to take from each source per cycle.
    pub entries_per_source: usize,

    /// RSS endpoint queried for the weather badge.
    pub weather_feed_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_minutes: 15,
            market_interval_secs: 60,
            weather_interval_minutes: 30,
            entries_per_source: 10,
            weather_feed_url:
                "https://news.google.com/rss/search?q=weather+tokyo&hl=ja&gl=JP&ceid=JP:ja"
                    .to_string(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted, logged as a warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Warn on keys we will never read — a typo in the config would
        // otherwise be silently ignored forever.
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "refresh_interval_minutes",
                "market_interval_secs",
                "weather_interval_minutes",
                "entries_per_source",
                "weather_feed_url",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown config key (possible typo)");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================

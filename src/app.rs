//! Central application state.
//!
//! One `App` instance lives on the UI task and owns every shared
//! collection: the aggregated entries, the visible subset, the pinned/read
//! sets, the source registry, and the settings document's in-memory form.
//! Background workers never touch it; they receive snapshots and report
//! back through `AppEvent`.

use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use reqwest::redirect::Policy;
use tokio::time::Instant;

use crate::config::Config;
use crate::feed::Entry;
use crate::filter::visible_entries;
use crate::market::SYNCING_TEXT;
use crate::settings::{self, SettingsDocument, DEFAULT_MEMO};
use crate::sources::{SourceError, SourceRegistry};
use crate::startup;
use crate::theme::{AccentVariant, Palette};
use crate::weather::INITIAL_BADGE;

/// How long a status message stays on screen.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Events
// ============================================================================

/// Events from background tasks, marshaled back onto the UI task.
pub enum AppEvent {
    /// A completed aggregation pass.
    EntriesFetched(Vec<Entry>),
    /// A fresh (or degraded) market marquee line.
    TickerUpdated(String),
    /// A fresh weather badge. Failures never produce this event.
    WeatherUpdated(String),
    /// The canned analysis for a headline is ready to display.
    AnalysisReady { title: String },
}

// ============================================================================
// Input Modes
// ============================================================================

/// Where keystrokes are routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the search query; filtering happens per keystroke.
    Search,
    /// Editing the memo into a buffer; committed on Enter.
    Memo { buffer: String },
    /// First step of adding a source: the display name.
    AddSourceName { buffer: String },
    /// Second step: the feed URL.
    AddSourceUrl { name: String, buffer: String },
}

// ============================================================================
// HTTP Client Configuration
// ============================================================================

/// Redirect policy with loop detection and limited hops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        attempt.follow()
    })
}

// ============================================================================
// Application State
// ============================================================================

pub struct App {
    pub config: Config,
    pub http_client: reqwest::Client,
    settings_path: PathBuf,

    // Theme
    pub accent: AccentVariant,
    pub palette: Palette,

    // Data
    pub registry: SourceRegistry,
    pub all_entries: Vec<Entry>,
    pub visible: Vec<Entry>,
    pub pinned: HashSet<String>,
    pub read: HashSet<String>,

    // User state
    pub memo: String,
    pub sound_enabled: bool,
    pub query: String,

    // UI state
    pub input_mode: InputMode,
    pub selected: usize,
    pub cinema_mode: bool,
    pub show_help: bool,
    pub analysis: Option<String>,
    pub refreshing: bool,
    pub needs_redraw: bool,

    // Side widgets
    pub ticker_text: String,
    pub ticker_offset: usize,
    pub weather_badge: String,
    pub cpu_pct: u8,
    pub ram_pct: u8,

    // Status line
    pub status_message: Option<(Cow<'static, str>, Instant)>,
}

impl App {
    pub fn new(config: Config, doc: SettingsDocument, settings_path: PathBuf) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(std::time::Duration::from_secs(30))
            .tcp_keepalive(std::time::Duration::from_secs(60))
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        let accent = AccentVariant::from_index(doc.theme_idx);
        let registry = SourceRegistry::from_parts(doc.sources.clone(), doc.active_sources.clone());

        Ok(Self {
            config,
            http_client,
            settings_path,
            accent,
            palette: accent.palette(),
            registry,
            all_entries: Vec::new(),
            visible: Vec::new(),
            pinned: doc.pinned_set(),
            read: doc.read_set(),
            memo: doc.memo,
            sound_enabled: doc.sound,
            query: String::new(),
            input_mode: InputMode::Normal,
            selected: 0,
            cinema_mode: false,
            show_help: false,
            analysis: None,
            refreshing: false,
            needs_redraw: true,
            ticker_text: SYNCING_TEXT.to_string(),
            ticker_offset: 0,
            weather_badge: INITIAL_BADGE.to_string(),
            cpu_pct: 0,
            ram_pct: 0,
            status_message: None,
        })
    }

    // ========================================================================
    // Aggregation results
    // ========================================================================

    /// Apply a completed aggregation pass: ping on new links, swap the
    /// entry list wholesale, and rebuild the visible subset.
    pub fn apply_entries(&mut self, entries: Vec<Entry>) {
        if !self.all_entries.is_empty() && has_new_links(&self.all_entries, &entries) {
            self.ping();
        }

        self.all_entries = entries;
        self.refreshing = false;
        self.refresh_visible();
        self.set_status(format!("SYNC: {}", Local::now().format("%H:%M:%S")));
    }

    /// Recompute the visible subset from the full entry list. Called on
    /// every keystroke, pin toggle, source toggle, and aggregation pass.
    pub fn refresh_visible(&mut self) {
        self.visible = visible_entries(&self.all_entries, &self.query, &self.registry, &self.pinned);
        self.clamp_selection();
        self.needs_redraw = true;
    }

    fn clamp_selection(&mut self) {
        if self.visible.is_empty() {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(self.visible.len() - 1);
        }
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.visible.get(self.selected)
    }

    // ========================================================================
    // User actions
    // ========================================================================

    /// Toggle the pin on the selected entry's link and persist.
    pub fn toggle_pin_selected(&mut self) {
        let Some(link) = self.selected_entry().map(|e| e.link.clone()) else {
            return;
        };
        if !self.pinned.remove(&link) {
            self.pinned.insert(link);
        }
        self.save_settings();
        self.refresh_visible();
    }

    /// Open the selected entry in the browser and mark it read (monotonic).
    pub fn open_selected(&mut self) {
        let Some(link) = self.selected_entry().map(|e| e.link.clone()) else {
            return;
        };
        if let Err(e) = open::that(&link) {
            tracing::warn!(link = %link, error = %e, "Failed to open link");
            self.set_status("OPEN_FAILED");
            return;
        }
        self.read.insert(link);
        self.save_settings();
        self.refresh_visible();
    }

    /// Cycle the accent preset, persist, and return its name.
    pub fn cycle_theme(&mut self) -> &'static str {
        self.accent = self.accent.next();
        self.palette = self.accent.palette();
        self.save_settings();
        self.needs_redraw = true;
        self.accent.name()
    }

    /// Flip the notification-tone flag, persist, and return the new state.
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.save_settings();
        self.sound_enabled
    }

    /// Flip cinema auto-scroll (session-only, not persisted).
    pub fn toggle_cinema(&mut self) -> bool {
        self.cinema_mode = !self.cinema_mode;
        self.cinema_mode
    }

    /// Commit an edited memo. Blank input resets to the placeholder.
    pub fn set_memo(&mut self, text: &str) {
        self.memo = if text.trim().is_empty() {
            DEFAULT_MEMO.to_string()
        } else {
            text.to_string()
        };
        self.save_settings();
        self.needs_redraw = true;
    }

    /// Append a custom source, enable it, and persist.
    pub fn add_source(&mut self, name: &str, url: &str) -> Result<(), SourceError> {
        self.registry.add(name, url)?;
        self.save_settings();
        self.refresh_visible();
        Ok(())
    }

    /// Toggle the source at a list position; persist and refilter.
    pub fn toggle_source_at(&mut self, index: usize) -> Option<(String, bool)> {
        let result = self.registry.toggle_at(index)?;
        self.save_settings();
        self.refresh_visible();
        Some(result)
    }

    /// Flip the autostart entry, surfacing the outcome on the status line.
    pub fn toggle_autostart(&mut self) {
        let path = match startup::autostart_path() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot resolve autostart path");
                self.set_status("AUTOSTART_FAILED");
                return;
            }
        };
        match startup::toggle(&path) {
            Ok(true) => self.set_status("AUTOSTART: ON"),
            Ok(false) => self.set_status("AUTOSTART: OFF"),
            Err(e) => {
                tracing::warn!(error = %e, "Autostart toggle failed");
                self.set_status("AUTOSTART_FAILED");
            }
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.needs_redraw = true;
    }

    pub fn nav_down(&mut self) {
        if !self.visible.is_empty() {
            self.selected = (self.selected + 1).min(self.visible.len() - 1);
        }
        self.needs_redraw = true;
    }

    /// One cinema-mode step: advance the selection, wrapping to the top.
    pub fn cinema_step(&mut self) {
        if !self.cinema_mode || self.visible.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.visible.len();
        self.needs_redraw = true;
    }

    /// Advance the ticker marquee by one column.
    pub fn advance_ticker(&mut self) {
        self.ticker_offset = self.ticker_offset.wrapping_add(1);
        self.needs_redraw = true;
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Serialize the current user state back into a settings document.
    pub fn to_document(&self) -> SettingsDocument {
        SettingsDocument {
            memo: self.memo.clone(),
            theme_idx: self.accent.index(),
            pinned: self.pinned.iter().cloned().collect(),
            read: self.read.iter().cloned().collect(),
            sound: self.sound_enabled,
            sources: self.registry.sources().to_vec(),
            active_sources: self.registry.active_map().clone(),
        }
    }

    /// Whole-document best-effort save. Called after every mutation.
    pub fn save_settings(&self) {
        settings::save(&self.settings_path, &self.to_document());
    }

    // ========================================================================
    // Status line
    // ========================================================================

    /// Set a status message (auto-expires).
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear the status message once expired. Returns true if cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    // ========================================================================
    // Notification tone
    // ========================================================================

    /// Short notification tone (terminal bell), gated on the sound flag.
    pub fn ping(&self) {
        if !self.sound_enabled {
            return;
        }
        let mut out = std::io::stdout();
        let _ = out.write_all(b"\x07");
        let _ = out.flush();
    }
}

/// Whether `next` contains any link absent from `prev`.
pub fn has_new_links(prev: &[Entry], next: &[Entry]) -> bool {
    let seen: HashSet<&str> = prev.iter().map(|e| e.link.as_str()).collect();
    next.iter().any(|e| !seen.contains(e.link.as_str()))
}

/// The canned analysis blurb for a headline.
pub fn canned_analysis(title: &str) -> String {
    let short: String = title.chars().take(50).collect();
    format!(
        "Article: {}...\n\n1. Market impact predicted.\n2. Key stakeholders identified.\n3. Sentiment: Neutral/Positive.",
        short
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{self, Duration};

    fn test_entry(title: &str, link: &str, source: &str) -> Entry {
        Entry {
            title: title.to_string(),
            link: link.to_string(),
            published: None,
            summary: None,
            source: source.to_string(),
        }
    }

    fn test_app() -> App {
        let path = std::env::temp_dir()
            .join("newsdeck_app_test")
            .join("settings.json");
        App::new(Config::default(), SettingsDocument::default(), path).unwrap()
    }

    #[tokio::test]
    async fn status_expires_after_ttl() {
        let mut app = test_app();
        time::pause();
        app.set_status("Test message");
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        app.clear_expired_status();
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        app.clear_expired_status();
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn pin_toggle_twice_restores_set() {
        let mut app = test_app();
        app.all_entries = vec![test_entry("A", "l1", "Reuters")];
        app.refresh_visible();

        let before = app.pinned.clone();
        app.toggle_pin_selected();
        assert!(app.pinned.contains("l1"));
        app.toggle_pin_selected();
        assert_eq!(app.pinned, before);
    }

    #[tokio::test]
    async fn sound_toggle_twice_restores_flag() {
        let mut app = test_app();
        let before = app.sound_enabled;
        app.toggle_sound();
        app.toggle_sound();
        assert_eq!(app.sound_enabled, before);
    }

    #[tokio::test]
    async fn blank_memo_resets_placeholder() {
        let mut app = test_app();
        app.set_memo("ship the release");
        assert_eq!(app.memo, "ship the release");
        app.set_memo("   ");
        assert_eq!(app.memo, DEFAULT_MEMO);
    }

    #[tokio::test]
    async fn apply_entries_rebuilds_visible_and_clears_refreshing() {
        let mut app = test_app();
        app.refreshing = true;
        app.apply_entries(vec![
            test_entry("One", "l1", "Reuters"),
            test_entry("Two", "l2", "Bloomberg"),
        ]);
        assert!(!app.refreshing);
        assert_eq!(app.visible.len(), 2);
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn selection_clamps_when_list_shrinks() {
        let mut app = test_app();
        app.all_entries = vec![
            test_entry("One", "l1", "Reuters"),
            test_entry("Two", "l2", "Reuters"),
            test_entry("Three", "l3", "Reuters"),
        ];
        app.refresh_visible();
        app.selected = 2;

        app.query = "One".to_string();
        app.refresh_visible();
        assert_eq!(app.selected, 0);
    }

    #[tokio::test]
    async fn cinema_step_wraps_to_top() {
        let mut app = test_app();
        app.all_entries = vec![
            test_entry("One", "l1", "Reuters"),
            test_entry("Two", "l2", "Reuters"),
        ];
        app.refresh_visible();
        app.cinema_mode = true;

        app.cinema_step();
        assert_eq!(app.selected, 1);
        app.cinema_step();
        assert_eq!(app.selected, 0);
    }

    #[tokio::test]
    async fn cinema_step_is_inert_when_disabled() {
        let mut app = test_app();
        app.all_entries = vec![test_entry("One", "l1", "Reuters")];
        app.refresh_visible();
        app.cinema_step();
        assert_eq!(app.selected, 0);
    }

    #[tokio::test]
    async fn document_round_trips_through_app() {
        let mut doc = SettingsDocument::default();
        doc.memo = "memo text".to_string();
        doc.theme_idx = 1;
        doc.pinned = vec!["l1".to_string()];
        doc.sound = false;

        let path = std::env::temp_dir()
            .join("newsdeck_app_test")
            .join("roundtrip.json");
        let app = App::new(Config::default(), doc, path).unwrap();
        let out = app.to_document();

        assert_eq!(out.memo, "memo text");
        assert_eq!(out.theme_idx, 1);
        assert_eq!(out.pinned, vec!["l1".to_string()]);
        assert!(!out.sound);
        // Registry fell back to defaults and serialized them explicitly
        assert_eq!(out.sources.len(), 2);
    }

    #[test]
    fn new_links_detected_only_when_absent_before() {
        let prev = vec![test_entry("A", "l1", "S")];
        let same = vec![test_entry("A", "l1", "S")];
        let fresh = vec![test_entry("B", "l2", "S")];

        assert!(!has_new_links(&prev, &same));
        assert!(has_new_links(&prev, &fresh));
        assert!(!has_new_links(&prev, &[]));
    }

    #[test]
    fn canned_analysis_truncates_long_titles() {
        let long = "x".repeat(120);
        let text = canned_analysis(&long);
        assert!(text.starts_with("Article: "));
        assert!(text.contains("Sentiment"));
        assert!(text.len() < 220);
    }
}

//! Integration tests for the settings lifecycle: load, mutate, persist.
//!
//! Each test writes to its own file under the system temp dir for
//! isolation. These tests exercise the whole-document contract end-to-end:
//! defaults on any load failure, best-effort saves, and idempotent user
//! toggles flowing back through the document.

use std::path::PathBuf;

use pretty_assertions::assert_eq;

use newsdeck::app::App;
use newsdeck::config::Config;
use newsdeck::settings::{self, SettingsDocument, DEFAULT_MEMO};
use newsdeck::sources::Source;

fn temp_settings(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("newsdeck_lifecycle_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

fn test_app(path: PathBuf) -> App {
    let doc = settings::load(&path);
    App::new(Config::default(), doc, path).unwrap()
}

// ============================================================================
// Load Fallback
// ============================================================================

#[test]
fn missing_file_yields_default_document() {
    let doc = settings::load(&temp_settings("never_written.json"));
    assert_eq!(doc.memo, DEFAULT_MEMO);
    assert_eq!(doc.theme_idx, 0);
    assert!(doc.sound);
    assert!(doc.pinned.is_empty());
    assert!(doc.read.is_empty());
}

#[test]
fn corrupt_file_yields_default_document() {
    let path = temp_settings("corrupt.json");
    std::fs::write(&path, "}}}{{{ definitely not json").unwrap();
    let doc = settings::load(&path);
    assert_eq!(doc.memo, DEFAULT_MEMO);
}

#[test]
fn truncated_file_yields_default_document() {
    // Simulates a crash mid-write: valid prefix, cut off partway
    let path = temp_settings("truncated.json");
    std::fs::write(&path, r#"{"memo": "half a doc", "pinned": ["#).unwrap();
    let doc = settings::load(&path);
    assert_eq!(doc.memo, DEFAULT_MEMO);
}

// ============================================================================
// Round Trip
// ============================================================================

#[test]
fn full_document_round_trips_as_sets() {
    let path = temp_settings("roundtrip.json");

    let mut doc = SettingsDocument::default();
    doc.memo = "call the broker 15:00".to_string();
    doc.theme_idx = 2;
    doc.pinned = vec!["https://x.example/a".into(), "https://x.example/b".into()];
    doc.read = vec!["https://x.example/b".into(), "https://x.example/c".into()];
    doc.sound = false;
    doc.sources = vec![
        Source {
            name: "Reuters".into(),
            url: "https://news.example/reuters.rss".into(),
        },
        Source {
            name: "Custom".into(),
            url: "https://feeds.example/custom.rss".into(),
        },
    ];
    doc.active_sources.insert("Custom".into(), false);

    settings::save(&path, &doc);
    let loaded = settings::load(&path);

    assert_eq!(loaded.memo, doc.memo);
    assert_eq!(loaded.theme_idx, doc.theme_idx);
    assert_eq!(loaded.pinned_set(), doc.pinned_set());
    assert_eq!(loaded.read_set(), doc.read_set());
    assert_eq!(loaded.sound, doc.sound);
    assert_eq!(loaded.sources, doc.sources);
    assert_eq!(loaded.active_sources, doc.active_sources);
}

// ============================================================================
// Mutations Persist Through the App
// ============================================================================

#[tokio::test]
async fn pin_toggle_persists_and_untoggle_restores() {
    let path = temp_settings("pin_toggle.json");
    let mut app = test_app(path.clone());
    app.all_entries = vec![newsdeck::feed::Entry {
        title: "Pin me".into(),
        link: "https://x.example/pin".into(),
        published: None,
        summary: None,
        source: "Reuters".into(),
    }];
    app.refresh_visible();

    app.toggle_pin_selected();
    let on_disk = settings::load(&path);
    assert!(on_disk.pinned_set().contains("https://x.example/pin"));

    app.toggle_pin_selected();
    let on_disk = settings::load(&path);
    assert!(on_disk.pinned_set().is_empty());
}

#[tokio::test]
async fn sound_toggle_twice_round_trips_through_disk() {
    let path = temp_settings("sound_toggle.json");
    let mut app = test_app(path.clone());
    let initial = app.sound_enabled;

    app.toggle_sound();
    assert_eq!(settings::load(&path).sound, !initial);

    app.toggle_sound();
    assert_eq!(settings::load(&path).sound, initial);
}

#[tokio::test]
async fn source_toggle_and_custom_source_persist() {
    let path = temp_settings("sources.json");

    {
        let mut app = test_app(path.clone());
        app.toggle_source_at(0).unwrap();
        app.add_source("Custom", "https://feeds.example/custom.rss")
            .unwrap();
    }

    // A second session sees the muted default and the new source
    let app = test_app(path);
    assert!(!app.registry.is_active("Reuters"));
    assert!(app.registry.is_active("Custom"));
    assert_eq!(app.registry.len(), 3);
}

#[tokio::test]
async fn theme_cycle_persists_index() {
    let path = temp_settings("theme.json");

    {
        let mut app = test_app(path.clone());
        app.cycle_theme();
        app.cycle_theme();
    }

    let doc = settings::load(&path);
    assert_eq!(doc.theme_idx, 2);
}

#[tokio::test]
async fn memo_edit_persists() {
    let path = temp_settings("memo.json");

    {
        let mut app = test_app(path.clone());
        app.set_memo("renew certificates");
    }

    assert_eq!(settings::load(&path).memo, "renew certificates");
}

//! Key dispatch.
//!
//! Input modes route keystrokes first: search edits the live query,
//! memo/add-source edit a buffer committed on Enter. Overlays swallow
//! everything except their dismiss keys. Only then does the normal key
//! map apply.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use crate::app::{App, AppEvent, InputMode};
use crate::settings::DEFAULT_MEMO;

use super::loop_runner::{spawn_feed_refresh, Action};

/// Simulated thinking time before the canned analysis pops.
const ANALYSIS_DELAY: Duration = Duration::from_secs(1);

pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    _modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Overlays swallow input until dismissed
    if app.analysis.is_some() {
        if matches!(code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            app.analysis = None;
        }
        return Ok(Action::Continue);
    }
    if app.show_help {
        if matches!(code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?')) {
            app.show_help = false;
        }
        return Ok(Action::Continue);
    }

    match app.input_mode.clone() {
        InputMode::Search => handle_search_mode(app, code),
        InputMode::Memo { buffer } => handle_memo_mode(app, code, buffer),
        InputMode::AddSourceName { buffer } => handle_add_name_mode(app, code, buffer),
        InputMode::AddSourceUrl { name, buffer } => {
            handle_add_url_mode(app, code, name, buffer, event_tx)
        }
        InputMode::Normal => handle_normal_mode(app, code, event_tx),
    }
}

fn handle_search_mode(app: &mut App, code: KeyCode) -> Result<Action> {
    match code {
        KeyCode::Esc => {
            app.query.clear();
            app.input_mode = InputMode::Normal;
            app.refresh_visible();
        }
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.query.pop();
            app.refresh_visible();
        }
        KeyCode::Char(c) => {
            app.query.push(c);
            app.refresh_visible();
        }
        _ => {}
    }
    Ok(Action::Continue)
}

fn handle_memo_mode(app: &mut App, code: KeyCode, mut buffer: String) -> Result<Action> {
    match code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.set_memo(&buffer);
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            buffer.pop();
            app.input_mode = InputMode::Memo { buffer };
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            app.input_mode = InputMode::Memo { buffer };
        }
        _ => {}
    }
    Ok(Action::Continue)
}

fn handle_add_name_mode(app: &mut App, code: KeyCode, mut buffer: String) -> Result<Action> {
    match code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            if buffer.trim().is_empty() {
                app.input_mode = InputMode::Normal;
            } else {
                app.input_mode = InputMode::AddSourceUrl {
                    name: buffer,
                    buffer: String::new(),
                };
            }
        }
        KeyCode::Backspace => {
            buffer.pop();
            app.input_mode = InputMode::AddSourceName { buffer };
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            app.input_mode = InputMode::AddSourceName { buffer };
        }
        _ => {}
    }
    Ok(Action::Continue)
}

fn handle_add_url_mode(
    app: &mut App,
    code: KeyCode,
    name: String,
    mut buffer: String,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    match code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            match app.add_source(&name, buffer.trim()) {
                Ok(()) => {
                    app.set_status(format!("SOURCE_ADDED: {}", name));
                    spawn_feed_refresh(app, event_tx);
                }
                Err(e) => app.set_status(e.to_string()),
            }
        }
        KeyCode::Backspace => {
            buffer.pop();
            app.input_mode = InputMode::AddSourceUrl { name, buffer };
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            app.input_mode = InputMode::AddSourceUrl { name, buffer };
        }
        _ => {}
    }
    Ok(Action::Continue)
}

fn handle_normal_mode(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),

        KeyCode::Char('/') => {
            app.query.clear();
            app.input_mode = InputMode::Search;
            app.refresh_visible();
        }

        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),

        KeyCode::Enter | KeyCode::Char('o') => app.open_selected(),
        KeyCode::Char('p') => app.toggle_pin_selected(),

        KeyCode::Char('r') => spawn_feed_refresh(app, event_tx),

        KeyCode::Char('t') => {
            let name = app.cycle_theme();
            app.set_status(format!("THEME: {}", name));
        }

        KeyCode::Char('m') => {
            let buffer = if app.memo == DEFAULT_MEMO {
                String::new()
            } else {
                app.memo.clone()
            };
            app.input_mode = InputMode::Memo { buffer };
        }

        KeyCode::Char('S') => {
            let on = app.toggle_sound();
            app.set_status(if on { "SOUND: ON" } else { "SOUND: OFF" });
        }

        KeyCode::Char('c') => {
            let on = app.toggle_cinema();
            app.set_status(if on { "CINEMA: ON" } else { "CINEMA: OFF" });
        }

        KeyCode::Char('A') => app.toggle_autostart(),

        KeyCode::Char('a') => {
            app.input_mode = InputMode::AddSourceName {
                buffer: String::new(),
            };
        }

        KeyCode::Char('i') => spawn_analysis(app, event_tx),

        KeyCode::Char('?') => app.show_help = true,

        KeyCode::Char(d @ '1'..='9') => {
            let index = d as usize - '1' as usize;
            if let Some((name, on)) = app.toggle_source_at(index) {
                app.set_status(format!(
                    "{}: {}",
                    name,
                    if on { "ACTIVE" } else { "MUTED" }
                ));
            }
        }

        _ => {}
    }
    Ok(Action::Continue)
}

/// Queue the canned analysis for the selected headline after a short
/// simulated delay.
fn spawn_analysis(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(title) = app.selected_entry().map(|e| e.title.clone()) else {
        return;
    };
    app.set_status("AI ANALYZING...");

    let tx = event_tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(ANALYSIS_DELAY).await;
        let _ = tx.send(AppEvent::AnalysisReady { title }).await;
    });
}

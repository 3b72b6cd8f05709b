//! Main event loop for the deck.
//!
//! Multiplexes terminal input, background task events, and the timer set
//! that drives every periodic concern: the 250ms UI tick (marquee, status
//! expiry), cinema auto-scroll, gauge sampling, and the market, weather,
//! and feed poll cycles. Each periodic task reschedules unconditionally;
//! a failed cycle is simply retried at the next tick.

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use crate::app::{App, AppEvent};
use crate::feed::fetch_all;
use crate::market::MarketClient;
use crate::sysstats::SysStats;
use crate::weather::WeatherClient;

use super::events::handle_app_event;
use super::input::handle_input;
use super::render::render;

/// Result of handling a key press event.
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// UI tick driving the marquee and status expiry.
const TICK_INTERVAL: Duration = Duration::from_millis(250);
/// Cinema auto-scroll cadence.
const CINEMA_INTERVAL: Duration = Duration::from_millis(800);
/// Gauge sampling cadence.
const SYSSTATS_INTERVAL: Duration = Duration::from_secs(2);

/// Runs the deck's event loop until the user quits.
///
/// The intervals all fire their first tick immediately, which doubles as
/// the startup fetch for feeds, market, and weather.
///
/// # Panic Safety
///
/// Installs a panic hook that restores terminal state before unwinding,
/// ensuring the terminal is not left in raw mode on panic.
pub async fn run(
    app: &mut App,
    sys: &mut SysStats,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    // Install panic hook BEFORE setting up terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();

    let mut tick_interval = tokio::time::interval(TICK_INTERVAL);
    let mut cinema_interval = tokio::time::interval(CINEMA_INTERVAL);
    let mut sys_interval = tokio::time::interval(SYSSTATS_INTERVAL);
    let mut market_interval =
        tokio::time::interval(Duration::from_secs(app.config.market_interval_secs.max(1)));
    let mut weather_interval = tokio::time::interval(Duration::from_secs(
        app.config.weather_interval_minutes.max(1) * 60,
    ));
    let mut feed_interval = tokio::time::interval(Duration::from_secs(
        app.config.refresh_interval_minutes.max(1) * 60,
    ));

    // Signal handlers for graceful shutdown (Unix only)
    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    loop {
        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        // Drain pending background events before blocking, so a burst of
        // completions is applied in one pass instead of one per select.
        while let Ok(event) = event_rx.try_recv() {
            app.needs_redraw = true;
            handle_app_event(app, event);
        }

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            maybe_event = event_stream.next() => {
                if let Some(Ok(Event::Key(key))) = maybe_event {
                    app.needs_redraw = true;
                    match handle_input(app, key.code, key.modifiers, &event_tx) {
                        Ok(Action::Quit) => break,
                        Ok(Action::Continue) => {}
                        Err(e) => app.set_status(format!("Error: {}", e)),
                    }
                }
            }

            Some(event) = event_rx.recv() => {
                app.needs_redraw = true;
                handle_app_event(app, event);
            }

            _ = tick_interval.tick() => {
                app.advance_ticker();
            }

            _ = cinema_interval.tick() => {
                app.cinema_step();
            }

            _ = sys_interval.tick() => {
                let sample = sys.sample();
                app.cpu_pct = sample.cpu_pct;
                app.ram_pct = sample.ram_pct;
                app.needs_redraw = true;
            }

            _ = market_interval.tick() => {
                spawn_market_poll(app, &event_tx);
            }

            _ = weather_interval.tick() => {
                spawn_weather_poll(app, &event_tx);
            }

            _ = feed_interval.tick() => {
                spawn_feed_refresh(app, &event_tx);
            }
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

/// Kick off one aggregation pass on a worker task.
///
/// The worker gets a registry snapshot; toggles made while it runs apply
/// to the next pass. Overlapping passes are possible (manual refresh
/// during an automatic one) and unguarded — the last completion wins.
pub(super) fn spawn_feed_refresh(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    app.refreshing = true;
    app.set_status("HUB_SYNCING...");

    let client = app.http_client.clone();
    let registry = app.registry.clone();
    let limit = app.config.entries_per_source;
    let tx = event_tx.clone();

    tokio::spawn(async move {
        let entries = fetch_all(&client, &registry, limit, Utc::now()).await;
        if tx.send(AppEvent::EntriesFetched(entries)).await.is_err() {
            tracing::warn!("Feed refresh result dropped (receiver closed)");
        }
    });
}

/// Kick off one market ticker poll on a worker task.
fn spawn_market_poll(app: &App, event_tx: &mpsc::Sender<AppEvent>) {
    let market = MarketClient::new(app.http_client.clone());
    let tx = event_tx.clone();

    tokio::spawn(async move {
        let line = market.ticker_line().await;
        if tx.send(AppEvent::TickerUpdated(line)).await.is_err() {
            tracing::warn!("Ticker result dropped (receiver closed)");
        }
    });
}

/// Kick off one weather poll on a worker task.
fn spawn_weather_poll(app: &App, event_tx: &mpsc::Sender<AppEvent>) {
    let weather = WeatherClient::new(app.http_client.clone(), app.config.weather_feed_url.clone());
    let tx = event_tx.clone();

    tokio::spawn(async move {
        if let Some(badge) = weather.fetch_badge().await {
            if tx.send(AppEvent::WeatherUpdated(badge)).await.is_err() {
                tracing::warn!("Weather result dropped (receiver closed)");
            }
        }
    });
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

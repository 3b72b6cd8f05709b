use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use newsdeck::app::{App, AppEvent};
use newsdeck::config::Config;
use newsdeck::settings;
use newsdeck::sysstats::SysStats;
use newsdeck::ui;

/// Get the config directory path (~/.config/newsdeck/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("newsdeck"))
}

#[derive(Parser, Debug)]
#[command(name = "newsdeck", version, about = "Cyberpunk terminal news deck")]
struct Args {}

#[tokio::main]
async fn main() -> Result<()> {
    let _args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    // User-only access on Unix — the settings document is personal state
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = std::fs::metadata(&config_dir) {
            let mut perms = metadata.permissions();
            perms.set_mode(0o700);
            let _ = std::fs::set_permissions(&config_dir, perms);
        }
    }

    // The terminal belongs to the TUI; logs go to a file in the config dir
    let log_file = std::fs::File::create(config_dir.join("newsdeck.log"))
        .context("Failed to create log file")?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();

    // Tuning config is optional; a broken file degrades to defaults
    let config_path = config_dir.join("config.toml");
    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(path = %config_path.display(), error = %e, "Config unusable, using defaults");
            Config::default()
        }
    };

    let settings_path = config_dir.join("settings.json");
    let doc = settings::load(&settings_path);

    let mut app = App::new(config, doc, settings_path).context("Failed to create application")?;
    let mut sys = SysStats::new();

    // Event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, &mut sys, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}

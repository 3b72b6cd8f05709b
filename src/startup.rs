//! Login autostart via an XDG autostart desktop entry.
//!
//! The presence of the file IS the on/off state; toggling writes or
//! removes it, so repeated toggles are idempotent pairs. Failures surface
//! to the caller for a status-line message; nothing here is fatal.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Resolve the autostart entry path (~/.config/autostart/newsdeck.desktop).
pub fn autostart_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("autostart")
        .join("newsdeck.desktop"))
}

/// Whether autostart is currently enabled.
pub fn is_enabled(path: &Path) -> bool {
    path.exists()
}

/// Flip the autostart state. Returns the new state (true = enabled).
pub fn toggle(path: &Path) -> Result<bool> {
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove autostart entry '{}'", path.display()))?;
        return Ok(false);
    }

    let exe = std::env::current_exe().context("Failed to resolve current executable path")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create '{}'", parent.display()))?;
    }
    std::fs::write(path, desktop_entry(&exe))
        .with_context(|| format!("Failed to write autostart entry '{}'", path.display()))?;
    Ok(true)
}

fn desktop_entry(exe: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name=newsdeck\n\
         Comment=Cyberpunk terminal news deck\n\
         Exec={}\n\
         Terminal=true\n\
         X-GNOME-Autostart-enabled=true\n",
        exe.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_entry(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("newsdeck_startup_test");
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn toggle_creates_then_removes() {
        let path = temp_entry("toggle.desktop");
        std::fs::remove_file(&path).ok();

        assert!(!is_enabled(&path));
        assert!(toggle(&path).unwrap());
        assert!(is_enabled(&path));
        assert!(!toggle(&path).unwrap());
        assert!(!is_enabled(&path));
    }

    #[test]
    fn two_toggles_restore_initial_state() {
        let path = temp_entry("parity.desktop");
        std::fs::remove_file(&path).ok();

        let initial = is_enabled(&path);
        toggle(&path).unwrap();
        toggle(&path).unwrap();
        assert_eq!(is_enabled(&path), initial);
    }

    #[test]
    fn entry_launches_current_executable() {
        let path = temp_entry("exec.desktop");
        std::fs::remove_file(&path).ok();

        toggle(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[Desktop Entry]"));
        assert!(content.contains("Exec="));
        std::fs::remove_file(&path).ok();
    }
}

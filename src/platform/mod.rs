// Per-OS locations of the settings document and the bookmark store.
//
// Linux follows XDG, macOS uses Application Support, Windows uses %APPDATA%.
// COLLECTIONBAR_DATA_DIR replaces both directories, mainly for tests and sandboxes.

use std::env;
use std::path::PathBuf;

/// Directory name under the platform base directories.
pub const APP_DIR_NAME: &str = "collectionbar";

/// Overrides both the config and data directory when set.
pub const DATA_DIR_ENV: &str = "COLLECTIONBAR_DATA_DIR";

const STORAGE_FILE: &str = "storage.json";
const BOOKMARKS_DB_FILE: &str = "bookmarks.db";

fn dir_override() -> Option<PathBuf> {
    env::var(DATA_DIR_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// `$<xdg_var>` when set, else `$HOME/<fallback...>`.
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn xdg_dir(xdg_var: &str, fallback: &[&str]) -> PathBuf {
    match env::var(xdg_var) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => fallback.iter().fold(home_dir(), |path, part| path.join(part)),
    }
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn base_config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", &[".config"])
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn base_data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"])
}

#[cfg(target_os = "macos")]
fn base_config_dir() -> PathBuf {
    home_dir().join("Library").join("Application Support")
}

#[cfg(target_os = "macos")]
fn base_data_dir() -> PathBuf {
    base_config_dir()
}

#[cfg(target_os = "windows")]
fn base_config_dir() -> PathBuf {
    match env::var("APPDATA") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => home_dir().join("AppData").join("Roaming"),
    }
}

#[cfg(target_os = "windows")]
fn base_data_dir() -> PathBuf {
    base_config_dir()
}

/// Directory holding the settings document.
///
/// - **Linux**: `$XDG_CONFIG_HOME/collectionbar` or `~/.config/collectionbar`
/// - **macOS**: `~/Library/Application Support/collectionbar`
/// - **Windows**: `%APPDATA%/collectionbar`
pub fn get_config_dir() -> PathBuf {
    dir_override().unwrap_or_else(|| base_config_dir().join(APP_DIR_NAME))
}

/// Directory holding the local bookmark store.
///
/// - **Linux**: `$XDG_DATA_HOME/collectionbar` or `~/.local/share/collectionbar`
/// - **macOS** and **Windows**: same as the config directory
pub fn get_data_dir() -> PathBuf {
    dir_override().unwrap_or_else(|| base_data_dir().join(APP_DIR_NAME))
}

pub fn storage_path() -> PathBuf {
    get_config_dir().join(STORAGE_FILE)
}

pub fn bookmarks_db_path() -> PathBuf {
    get_data_dir().join(BOOKMARKS_DB_FILE)
}

// Readshelf platform abstraction
// Per-OS locations for the settings file and the history database.
//
// The OS-specific module is selected at compile time with `cfg(target_os)`.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use self::linux as os;

#[cfg(target_os = "macos")]
use self::macos as os;

#[cfg(target_os = "windows")]
use self::windows as os;

/// Directory name used under the OS base directories (Linux uses the lowercase form).
pub const APP_DIR_NAME: &str = "Readshelf";

/// File name of the history database inside the data directory.
pub const DATABASE_FILE: &str = "readshelf.db";

/// Returns the platform-specific configuration directory.
///
/// - **Linux**: `$XDG_CONFIG_HOME/readshelf` or `~/.config/readshelf`
/// - **macOS**: `~/Library/Preferences/Readshelf`
/// - **Windows**: `%APPDATA%/Readshelf`
pub fn get_config_dir() -> PathBuf {
    os::get_config_dir()
}

/// Returns the platform-specific data directory.
///
/// - **Linux**: `$XDG_DATA_HOME/readshelf` or `~/.local/share/readshelf`
/// - **macOS**: `~/Library/Application Support/Readshelf`
/// - **Windows**: `%LOCALAPPDATA%/Readshelf`
pub fn get_data_dir() -> PathBuf {
    os::get_data_dir()
}

/// Default location of the history database.
pub fn default_database_path() -> PathBuf {
    get_data_dir().join(DATABASE_FILE)
}

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TASKLANE_DATA_DIR";

/// Returns the directory holding `tasks.json` and `darkMode.json`.
///
/// The path is determined in the following order:
/// 1. `TASKLANE_DATA_DIR` environment variable.
/// 2. `~/.local/share/tasklane` (on Linux).
/// 3. `.` (fallback).
pub fn data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push("tasklane");
            p
        })
}

/// Log file used while the TUI owns the terminal.
pub fn log_path() -> PathBuf {
    data_dir().join("tasklane.log")
}

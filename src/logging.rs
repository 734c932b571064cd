use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use crate::config;

/// Where log lines go.
pub enum LogTarget {
    Stderr,
    /// Append to the log file in the data directory.
    File,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Resolved destination for log output.
#[derive(Debug)]
pub enum LogSink {
    Stderr,
    File(File),
    /// Nothing is written.
    Discard,
}

impl LogSink {
    /// Picks the sink for `target`, opening `path` in `File` mode.
    ///
    /// In `File` mode the terminal belongs to the TUI, so a log file that
    /// cannot be opened means discarding output rather than writing to stderr.
    pub fn resolve(target: LogTarget, path: &Path) -> LogSink {
        match target {
            LogTarget::Stderr => LogSink::Stderr,
            LogTarget::File => match open_log_file(path) {
                Ok(file) => LogSink::File(file),
                Err(_) => LogSink::Discard,
            },
        }
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber. Level comes from `RUST_LOG`, default `warn`.
pub fn init(target: LogTarget) {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());
    match LogSink::resolve(target, &config::log_path()) {
        LogSink::Stderr => builder.with_writer(io::stderr).init(),
        LogSink::File(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
        LogSink::Discard => builder.with_writer(io::sink).init(),
    }
}

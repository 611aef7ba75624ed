use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

/// Set to "1" to write diagnostics to ~/.vscode2warp/debug/vscode2warp.log
pub const DEBUG_ENV: &str = "VSCODE2WARP_DEBUG";
const LOG_FILE: &str = "vscode2warp.log";

pub fn debug_enabled() -> bool {
    std::env::var(DEBUG_ENV).map(|v| v == "1").unwrap_or(false)
}

/// Install the file logger when debugging is enabled.
/// The TUI owns the terminal, so nothing is ever logged to stdout/stderr.
pub fn init() {
    if !debug_enabled() {
        return;
    }
    let Some(debug_dir) = Settings::debug_dir() else {
        return;
    };
    if fs::create_dir_all(&debug_dir).is_err() {
        return;
    }
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let Ok(file) = options.open(debug_dir.join(LOG_FILE)) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "debug logging enabled");
}

//! Logging through `tracing`, written to a file so the terminal stays free for the UI.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Maps a `-v` count to the default log level.
#[must_use]
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn build_env_filter(level: Level) -> EnvFilter {
    // RUST_LOG wins over the verbosity flag
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.as_str().to_lowercase();
        EnvFilter::new(format!("warn,sectionspy={level}"))
    })
}

/// Installs the global subscriber writing to `path`.
///
/// Without a path nothing is installed and log events are discarded.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
pub fn init_logging(path: Option<&Path>, verbosity: u8) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;
    let subscriber = fmt()
        .with_env_filter(build_env_filter(level_for(verbosity)))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(io::Error::other)
}

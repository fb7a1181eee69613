use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Keeps the non-blocking file writers flushing for the process lifetime.
/// Dropping this flushes and stops the background writer threads.
pub struct LogGuards {
    _debug: WorkerGuard,
    _error: WorkerGuard,
}

/// Installs the process-wide log sinks: a daily debug file, a daily
/// error-only file and stdout at INFO (overridable through `RUST_LOG`).
pub fn init(dir: &Path) -> Result<LogGuards> {
    std::fs::create_dir_all(dir)?;

    let (debug_writer, debug_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "debug.log"));
    let (error_writer, error_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "error.log"));

    let stdout_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(debug_writer)
                .with_ansi(false)
                .with_filter(LevelFilter::DEBUG),
        )
        .with(
            fmt::layer()
                .with_writer(error_writer)
                .with_ansi(false)
                .with_filter(LevelFilter::ERROR),
        )
        .with(fmt::layer().with_writer(std::io::stdout).with_filter(stdout_filter))
        .try_init()?;

    Ok(LogGuards {
        _debug: debug_guard,
        _error: error_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_log_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("logs");

        // A second init in the same process fails on the global subscriber,
        // but the directory is created either way.
        let _ = init(&dir);
        assert!(dir.is_dir());
    }
}

use crate::config::LoggingConfig;
use crate::constants::LOG_FILE_PREFIX;
use std::fs;
use std::io;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes logging: JSON lines to a daily-rotated file under
/// `config.log_dir`, human-readable output on stderr.
///
/// Stdout is left alone; it carries the progress messages of the run.
/// The returned guard must be held until exit so buffered file logs are flushed.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    // Respect RUST_LOG if set; otherwise info for our crate, warn elsewhere
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("disaster_etl=info,warn"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let dir_status = prepare_log_dir(config);
    let (file_layer, guard) = if matches!(dir_status, Ok(true)) {
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
        let layer = fmt::layer().json().with_writer(non_blocking_writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    // A subscriber may already be installed (tests, embedding hosts)
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    if let Err(e) = dir_status {
        warn!(
            "File logging disabled: cannot create log directory {}: {}",
            config.log_dir.display(),
            e
        );
    }

    guard
}

/// `Ok(true)` when the log directory exists and file logging is on,
/// `Ok(false)` when file logging is switched off.
fn prepare_log_dir(config: &LoggingConfig) -> io::Result<bool> {
    if !config.file_logging {
        return Ok(false);
    }
    fs::create_dir_all(&config.log_dir)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn log_dir_is_created_when_enabled() {
        let dir = tempdir().unwrap();
        let config = LoggingConfig {
            log_dir: dir.path().join("nested").join("logs"),
            file_logging: true,
        };

        assert!(prepare_log_dir(&config).unwrap());
        assert!(config.log_dir.is_dir());
    }

    #[test]
    fn disabled_file_logging_touches_nothing() {
        let dir = tempdir().unwrap();
        let config = LoggingConfig {
            log_dir: dir.path().join("logs"),
            file_logging: false,
        };

        assert!(!prepare_log_dir(&config).unwrap());
        assert!(!config.log_dir.exists());
    }

    #[test]
    fn uncreatable_log_dir_is_reported_and_skipped() {
        // A regular file where the directory should be
        let blocker = NamedTempFile::new().unwrap();
        let config = LoggingConfig {
            log_dir: blocker.path().join("logs"),
            file_logging: true,
        };

        assert!(prepare_log_dir(&config).is_err());
        assert!(init_logging(&config).is_none());
    }
}

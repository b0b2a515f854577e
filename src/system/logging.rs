//! Logging system initialization
//!
//! Sets up the tracing subscriber from `[logging]`: console or file output,
//! optional daily rotation, text or JSON format.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

use crate::config::LoggingConfig;

const DEFAULT_LOG_NAME: &str = "sharelink.log";

/// Open the configured log destination.
///
/// `None` or an empty file name means stderr, so stdout stays clean for
/// command output.
fn make_writer(config: &LoggingConfig) -> io::Result<Box<dyn io::Write + Send + Sync>> {
    let log_file = match config.file.as_deref() {
        Some(f) if !f.is_empty() => f,
        _ => return Ok(Box::new(io::stderr())),
    };

    let path = Path::new(log_file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)?;

    if config.enable_rotation {
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(DEFAULT_LOG_NAME);
        let appender = rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(filename.trim_end_matches(".log"))
            .filename_suffix("log")
            .max_log_files(config.max_backups.max(1) as usize)
            .build(dir)
            .map_err(io::Error::other)?;
        Ok(Box::new(appender))
    } else {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Box::new(file))
    }
}

/// Initialize logging from configuration
///
/// Call once at startup, after the configuration is loaded. The returned
/// `WorkerGuard` must be kept alive so buffered lines are flushed on exit.
///
/// `RUST_LOG` takes precedence over `logging.level` when set. If the log
/// file cannot be opened, logging falls back to stderr.
pub fn init_logging(config: &LoggingConfig) -> WorkerGuard {
    let (writer, to_console) = match make_writer(config) {
        Ok(w) => (w, config.file.as_deref().is_none_or(str::is_empty)),
        Err(e) => {
            eprintln!(
                "[WARN] Cannot open log file {:?}: {}, logging to stderr",
                config.file, e
            );
            (Box::new(io::stderr()) as Box<dyn io::Write + Send + Sync>, true)
        }
    };

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.level.clone()));

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(to_console);

    // try_init: a second call (tests, embedding) keeps the first subscriber
    let result = if config.format == "json" {
        subscriber_builder.json().try_init()
    } else {
        subscriber_builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("[WARN] Logging already initialized: {}", e);
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_make_writer_creates_plain_log_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("app.log");
        let config = LoggingConfig {
            file: Some(path.to_string_lossy().into_owned()),
            enable_rotation: false,
            ..LoggingConfig::default()
        };

        let mut writer = make_writer(&config).unwrap();
        writer.write_all(b"hello\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_make_writer_defaults_to_console() {
        let config = LoggingConfig::default();
        assert!(make_writer(&config).is_ok());
    }
}

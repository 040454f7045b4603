use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::formatter::BracketedFormatter;
use crate::error::LoggingError;

const DEFAULT_FILTER: &str = "info";

/// `dataset_splitter_<timestamp>.log`
pub fn log_file_name() -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!("dataset_splitter_{}.log", timestamp)
}

/// Install the global subscriber: stdout always, plus a log file when
/// `log_dir` is given. `RUST_LOG` overrides the default `info` filter.
///
/// # Returns
/// * `Ok(Some(path))` the log file path when file logging is enabled
/// * `Ok(None)` when logging only to stdout
pub fn setup_logging(log_dir: Option<&Path>) -> Result<Option<PathBuf>, LoggingError> {
    let (file_layer, log_path) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
            let log_path = dir.join(log_file_name());
            let file = fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&log_path)
                .map_err(|source| LoggingError::CreateFile {
                    path: log_path.clone(),
                    source,
                })?;

            let layer = fmt::layer()
                .event_format(BracketedFormatter)
                .with_writer(Mutex::new(file))
                .with_ansi(false);
            (Some(layer), Some(log_path))
        }
        None => (None, None),
    };

    let stdout_layer = fmt::layer()
        .event_format(BracketedFormatter)
        .with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with(file_layer)
        .with(stdout_layer)
        .try_init()?;

    if let Some(path) = &log_path {
        info!("Log file created at: {:?}", path);
    }
    Ok(log_path)
}

//! Error types for every layer of the splitter.
//!
//! Each enum carries the offending path and the underlying I/O error so the
//! caller can log it and decide at which scope to recover.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal configuration problems, reported before any processing starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Source directory is not specified")]
    MissingSource,
    #[error("Destination directory is not specified")]
    MissingDestination,
    #[error("Could not parse training ratio '{0}'")]
    InvalidRatioFormat(String),
    #[error("Training ratio must be greater than 0.0 and less than 1.0 (got {0})")]
    RatioOutOfRange(f64),
    #[error("Minimum file count must be at least 1")]
    InvalidMinFileCount,
    #[error("Maximum concurrent classes must be at least 1")]
    InvalidMaxConcurrent,
    #[error("Maximum copy workers must be at least 1")]
    InvalidCopyWorkers,
    #[error("Binary mode requires a positive class name")]
    MissingPositiveClass,
    #[error("Source directory does not exist: {0}")]
    SourceNotFound(PathBuf),
    #[error("Source path is not a directory: {0}")]
    SourceNotDirectory(PathBuf),
}

/// Failures while enumerating class directories or image files.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// Batch-fatal transfer failures. Per-file copy failures are not errors at
/// this level; they are collected in the batch outcome instead.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to start copy workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Failures while writing the output archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to create archive {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to add {path} to archive: {source}")]
    Append {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("Failed to finish archive {path}: {source}")]
    Finish {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors that end a whole run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to list class directories: {0}")]
    Discovery(#[from] DiscoveryError),
    #[error("Failed to start class workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
    #[error("No files found for positive class '{class}'")]
    EmptyPositiveClass { class: String },
    #[error("Run produced no output ({failed_classes} class(es) failed, 0 files transferred)")]
    NothingTransferred { failed_classes: usize },
    #[error("Failed to write summary {path}: {source}")]
    Summary {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors raised while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to create log file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing_subscriber::util::TryInitError),
}

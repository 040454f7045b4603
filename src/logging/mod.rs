//! Logging for the dataset splitter
//!
//! This module provides:
//! - Bracketed log formatting with thread names for concurrent output
//! - Stdout logging, plus an optional timestamped log file

mod formatter;
mod setup;

pub use formatter::BracketedFormatter;
pub use setup::{log_file_name, setup_logging};

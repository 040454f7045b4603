use std::num::NonZeroUsize;
use std::path::PathBuf;

use serde::Serialize;

use crate::core::dataset::Layout;
use crate::error::ConfigError;

pub const DEFAULT_TRAINING_RATIO: f64 = 0.8;
pub const DEFAULT_MIN_FILE_COUNT: usize = 50;

/// Validated configuration for one splitting run.
#[derive(Debug, Clone, Serialize)]
pub struct SplitConfig {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub training_ratio: f64,
    /// Sub-classes with fewer eligible files are skipped (nested, non-binary only)
    pub min_file_count: usize,
    pub tar_output: bool,
    pub max_concurrent_classes: usize,
    pub max_copy_workers: usize,
    pub binary_mode: bool,
    pub positive_class: Option<String>,
    pub layout: Layout,
    pub seed: Option<u64>,
    pub summary_path: Option<PathBuf>,
    /// Fail the run when every class failed and nothing was copied
    pub require_output: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::new(),
            dest_dir: PathBuf::new(),
            training_ratio: DEFAULT_TRAINING_RATIO,
            min_file_count: DEFAULT_MIN_FILE_COUNT,
            tar_output: false,
            max_concurrent_classes: default_class_concurrency(),
            max_copy_workers: default_copy_workers(),
            binary_mode: false,
            positive_class: None,
            layout: Layout::Nested,
            seed: None,
            summary_path: None,
            require_output: false,
        }
    }
}

impl SplitConfig {
    pub fn validation_ratio(&self) -> f64 {
        1.0 - self.training_ratio
    }

    /// Check everything that can be checked without touching the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingSource);
        }
        if self.dest_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingDestination);
        }
        if !(self.training_ratio > 0.0 && self.training_ratio < 1.0) {
            return Err(ConfigError::RatioOutOfRange(self.training_ratio));
        }
        if self.min_file_count < 1 {
            return Err(ConfigError::InvalidMinFileCount);
        }
        if self.max_concurrent_classes < 1 {
            return Err(ConfigError::InvalidMaxConcurrent);
        }
        if self.max_copy_workers < 1 {
            return Err(ConfigError::InvalidCopyWorkers);
        }
        if self.binary_mode && self.positive_class().is_none() {
            return Err(ConfigError::MissingPositiveClass);
        }
        Ok(())
    }

    /// The source root must exist and be a directory.
    pub fn check_source(&self) -> Result<(), ConfigError> {
        if !self.source_dir.exists() {
            return Err(ConfigError::SourceNotFound(self.source_dir.clone()));
        }
        if !self.source_dir.is_dir() {
            return Err(ConfigError::SourceNotDirectory(self.source_dir.clone()));
        }
        Ok(())
    }

    /// Positive class name, ignoring blank values.
    pub fn positive_class(&self) -> Option<&str> {
        self.positive_class
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Parse a training ratio given as a fraction (`0.75`) or percentage (`75%`).
pub fn parse_ratio(value: &str) -> Result<f64, ConfigError> {
    let trimmed = value.trim();
    let (number, percent) = match trimmed.strip_suffix('%') {
        Some(number) => (number.trim(), true),
        None => (trimmed, false),
    };

    let ratio: f64 = number
        .parse()
        .map_err(|_| ConfigError::InvalidRatioFormat(value.to_string()))?;
    if !ratio.is_finite() {
        return Err(ConfigError::InvalidRatioFormat(value.to_string()));
    }

    Ok(if percent { ratio / 100.0 } else { ratio })
}

fn hardware_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Half the available parallelism, at least one.
pub fn default_class_concurrency() -> usize {
    (hardware_parallelism() / 2).max(1)
}

/// All of the available parallelism, at least one.
pub fn default_copy_workers() -> usize {
    hardware_parallelism().max(1)
}

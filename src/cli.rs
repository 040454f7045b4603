//! Command-line surface.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{
    default_class_concurrency, default_copy_workers, parse_ratio, FileSettings, SplitConfig,
    DEFAULT_MIN_FILE_COUNT, DEFAULT_TRAINING_RATIO,
};
use crate::core::dataset::Layout;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    /// <class>/<sub-class>/images
    Nested,
    /// <class>/images
    Flat,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Nested => Layout::Nested,
            LayoutArg::Flat => Layout::Flat,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "dataset-splitter",
    version,
    about = "Split class-organized image folders into train/validation sets"
)]
pub struct Cli {
    /// Source directory (one sub-directory per class)
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Training ratio, as a fraction (0.8) or percentage (80%)
    #[arg(short, long)]
    pub ratio: Option<String>,

    /// Minimum files a sub-class needs to be copied
    #[arg(long = "min-files")]
    pub min_files: Option<usize>,

    /// Pack the output directory into <dest name>.tar
    #[arg(long)]
    pub tar: bool,

    /// Classes processed at once (0 = half the CPUs)
    #[arg(long = "max-concurrent")]
    pub max_concurrent: Option<usize>,

    /// Parallel copies per batch (0 = all CPUs)
    #[arg(long = "copy-workers")]
    pub copy_workers: Option<usize>,

    /// Build a balanced positive/negative dataset
    #[arg(long)]
    pub binary: bool,

    /// Class treated as positive in binary mode
    #[arg(long = "positive-class")]
    pub positive_class: Option<String>,

    /// Directory layout under each class
    #[arg(long, value_enum)]
    pub layout: Option<LayoutArg>,

    /// Seed for reproducible splits
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the run summary as JSON to this path
    #[arg(long = "summary-json")]
    pub summary_json: Option<PathBuf>,

    /// Exit with an error when nothing was transferred
    #[arg(long = "require-output")]
    pub require_output: bool,

    /// JSON settings file with defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write logs to a timestamped file in this directory
    #[arg(long = "log-dir")]
    pub log_dir: Option<PathBuf>,

    /// [SOURCE] [DEST] [RATIO], used when the matching flag is absent
    #[arg(value_name = "ARGS", num_args = 0..=3)]
    pub positional: Vec<String>,
}

impl Cli {
    /// Resolve the final configuration.
    ///
    /// Precedence: flag, then positional argument, then settings file, then
    /// built-in default. A concurrency limit of zero means "auto".
    pub fn into_config(self, settings: &FileSettings) -> Result<SplitConfig, ConfigError> {
        let mut positional = self.positional.into_iter();
        let pos_source = positional.next().map(PathBuf::from);
        let pos_dest = positional.next().map(PathBuf::from);
        let pos_ratio = positional.next();

        let source_dir = self
            .source
            .or(pos_source)
            .or_else(|| settings.source_dir.clone())
            .unwrap_or_default();
        let dest_dir = self
            .dest
            .or(pos_dest)
            .or_else(|| settings.dest_dir.clone())
            .unwrap_or_default();

        let training_ratio = match self.ratio.or(pos_ratio).or_else(|| settings.ratio.clone()) {
            Some(value) => parse_ratio(&value)?,
            None => DEFAULT_TRAINING_RATIO,
        };

        let max_concurrent_classes = match self
            .max_concurrent
            .or(settings.max_concurrent_classes)
        {
            Some(0) | None => default_class_concurrency(),
            Some(n) => n,
        };
        let max_copy_workers = match self.copy_workers.or(settings.max_copy_workers) {
            Some(0) | None => default_copy_workers(),
            Some(n) => n,
        };

        Ok(SplitConfig {
            source_dir,
            dest_dir,
            training_ratio,
            min_file_count: self
                .min_files
                .or(settings.min_file_count)
                .unwrap_or(DEFAULT_MIN_FILE_COUNT),
            tar_output: self.tar || settings.tar_output.unwrap_or(false),
            max_concurrent_classes,
            max_copy_workers,
            binary_mode: self.binary || settings.binary_mode.unwrap_or(false),
            positive_class: self
                .positive_class
                .or_else(|| settings.positive_class.clone()),
            layout: self
                .layout
                .map(Layout::from)
                .or(settings.layout)
                .unwrap_or_default(),
            seed: self.seed.or(settings.seed),
            summary_path: self.summary_json,
            require_output: self.require_output,
        })
    }
}

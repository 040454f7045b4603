mod settings;
mod split_config;

pub use settings::FileSettings;
pub use split_config::{
    default_class_concurrency, default_copy_workers, parse_ratio, SplitConfig,
    DEFAULT_MIN_FILE_COUNT, DEFAULT_TRAINING_RATIO,
};

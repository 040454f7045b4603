use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::dataset::Layout;

const SETTINGS_FILE_NAME: &str = "settings.json";

/// Optional defaults read from a JSON file. Command-line values win over
/// anything set here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub source_dir: Option<PathBuf>,
    pub dest_dir: Option<PathBuf>,
    /// Fraction or percentage string, e.g. `"0.8"` or `"80%"`
    pub ratio: Option<String>,
    pub min_file_count: Option<usize>,
    pub tar_output: Option<bool>,
    pub max_concurrent_classes: Option<usize>,
    pub max_copy_workers: Option<usize>,
    pub binary_mode: Option<bool>,
    pub positive_class: Option<String>,
    pub layout: Option<Layout>,
    pub seed: Option<u64>,
}

impl FileSettings {
    /// `settings.json` inside the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dataset-splitter")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE_NAME))
    }

    /// Load settings from `path` (or the default location), falling back to
    /// empty settings when the file is missing or corrupted.
    pub fn load(path: Option<&Path>) -> Self {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => {
                    warn!("Could not determine config directory. Using defaults.");
                    return Self::default();
                }
            },
        };

        match fs::read_to_string(&config_path) {
            Ok(contents) => match serde_json::from_str::<FileSettings>(&contents) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", config_path);
                    settings
                }
                Err(e) => {
                    warn!(
                        "Failed to parse settings file {:?}: {}. Using defaults.",
                        config_path, e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    info!("No settings file at {:?}. Using defaults.", config_path);
                } else {
                    warn!(
                        "Failed to read settings file {:?}: {}. Using defaults.",
                        config_path, e
                    );
                }
                Self::default()
            }
        }
    }
}

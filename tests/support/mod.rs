#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use dataset_splitter::SplitConfig;

/// Write `count` small fake images named `<prefix>_<n>.jpg` into `dir`.
pub fn write_images(dir: &Path, prefix: &str, count: usize) -> Vec<PathBuf> {
    fs::create_dir_all(dir).expect("create image dir");
    (0..count)
        .map(|i| {
            let path = dir.join(format!("{prefix}_{i:04}.jpg"));
            fs::write(&path, format!("{prefix}-{i}")).expect("write image");
            path
        })
        .collect()
}

/// File names directly inside `dir`, empty if it does not exist.
pub fn file_names(dir: &Path) -> BTreeSet<String> {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => BTreeSet::new(),
    }
}

pub fn count_files(dir: &Path) -> usize {
    file_names(dir).len()
}

/// Config with a fixed seed and small worker counts.
pub fn test_config(source: &Path, dest: &Path) -> SplitConfig {
    SplitConfig {
        source_dir: source.to_path_buf(),
        dest_dir: dest.to_path_buf(),
        seed: Some(42),
        max_concurrent_classes: 2,
        max_copy_workers: 4,
        ..SplitConfig::default()
    }
}

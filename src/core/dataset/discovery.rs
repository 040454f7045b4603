//! Filesystem discovery: class / sub-class directories and eligible images.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::FilePopulation;
use crate::error::DiscoveryError;

/// Extensions (lowercase, without the dot) that count as images.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Immediate, non-hidden child directories of `dir`, sorted by name.
pub fn list_subdirectories(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let read_dir = fs::read_dir(dir).map_err(|source| DiscoveryError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut subdirs = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| DiscoveryError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        // Skip .git, .DS_Store style entries
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let is_dir = entry
            .file_type()
            .map(|ft| ft.is_dir())
            .unwrap_or(false);
        if is_dir {
            subdirs.push(entry.path());
        }
    }

    subdirs.sort();
    Ok(subdirs)
}

/// Every image file under `dir`, recursively.
///
/// Hidden directories are only filtered at the class / sub-class level, so a
/// hidden folder nested inside a sub-class is still walked.
pub fn list_eligible_files(dir: &Path) -> Result<FilePopulation, DiscoveryError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| DiscoveryError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && is_image_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    debug!("Found {} eligible files under {:?}", files.len(), dir);
    Ok(FilePopulation::from(files))
}

/// Directory base name, used as class / group name.
pub fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

//! Tar packaging of the output tree.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::core::dataset::dir_name;
use crate::error::ArchiveError;

/// `<base name of output_root>.tar` in the current working directory.
///
/// The root is resolved first so `.` or `out/..` name the real directory.
pub fn archive_path_for(output_root: &Path) -> PathBuf {
    PathBuf::from(format!("{}.tar", dir_name(&resolve(output_root))))
}

fn resolve(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Write every directory and file under `output_root` into a tar archive at
/// `archive_path`, with entry names relative to `output_root`.
///
/// # Returns
/// * `Ok(entries)` number of entries written (directories included)
/// * `Err(ArchiveError)` if the archive or any entry could not be written
pub fn create_tar_archive(output_root: &Path, archive_path: &Path) -> Result<usize, ArchiveError> {
    info!("Creating tar archive {:?} from {:?}", archive_path, output_root);

    let file = File::create(archive_path).map_err(|source| ArchiveError::Create {
        path: archive_path.to_path_buf(),
        source,
    })?;
    let mut builder = tar::Builder::new(file);
    builder.follow_symlinks(false);

    // Compare resolved paths, the caller may spell either one differently
    let root = resolve(output_root);
    let archive_path = resolve(archive_path);

    let mut entries = 0;
    for entry in WalkDir::new(&root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| ArchiveError::Walk {
            path: output_root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        // An archive written inside the tree it packs must not include itself
        if path == archive_path {
            continue;
        }
        let relative = path.strip_prefix(&root).unwrap_or(path);

        let appended = if entry.file_type().is_dir() {
            builder.append_dir(relative, path)
        } else {
            builder.append_path_with_name(path, relative)
        };
        appended.map_err(|source| ArchiveError::Append {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Archived {:?}", relative);
        entries += 1;
    }

    builder
        .into_inner()
        .map_err(|source| ArchiveError::Finish {
            path: archive_path.to_path_buf(),
            source,
        })?;

    info!("Tar archive created: {:?} ({} entries)", archive_path, entries);
    Ok(entries)
}

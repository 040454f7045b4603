use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::TransferError;

/// Create `dir` and its parents if they do not exist yet.
///
/// Several workers may target the same split/group directory at once, so an
/// already existing directory is treated as success.
pub fn ensure_dir(dir: &Path) -> Result<(), TransferError> {
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(source) => Err(TransferError::CreateDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Copy a single file, overwriting the destination if present.
///
/// # Returns
/// * `Ok(bytes)` number of bytes copied
/// * `Err(io::Error)` if the source is unreadable or the destination unwritable
pub fn copy_file(src: &Path, dest: &Path) -> io::Result<u64> {
    let bytes = fs::copy(src, dest)?;
    debug!("Copied {:?} -> {:?} ({} bytes)", src, dest, bytes);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("train").join("cat");
        ensure_dir(&target).unwrap();
        ensure_dir(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_ensure_dir_concurrent_calls_never_error() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("validation").join("negative");

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8).map(|_| s.spawn(|| ensure_dir(&target))).collect();
            for handle in handles {
                assert!(handle.join().unwrap().is_ok());
            }
        });
        assert!(target.is_dir());
    }

    #[test]
    fn test_ensure_dir_fails_under_a_file() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a dir").unwrap();

        let result = ensure_dir(&blocker.join("train"));
        assert!(matches!(result, Err(TransferError::CreateDir { .. })));
    }

    #[test]
    fn test_copy_file_overwrites_destination() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("a.jpg");
        let dest = dir.path().join("b.jpg");
        fs::write(&src, b"new contents").unwrap();
        fs::write(&dest, b"old").unwrap();

        let bytes = copy_file(&src, &dest).unwrap();
        assert_eq!(bytes, 12);
        assert_eq!(fs::read(&dest).unwrap(), b"new contents");
    }

    #[test]
    fn test_copy_file_missing_source() {
        let dir = tempdir().unwrap();
        let result = copy_file(&dir.path().join("missing.jpg"), &dir.path().join("out.jpg"));
        assert!(result.is_err());
    }
}

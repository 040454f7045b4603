use std::path::{Path, PathBuf};

use crate::core::dataset::{DatasetSplit, FilePopulation};

/// A single file copy into `<destination_root>/<split>/<group>/<file_name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyJob {
    pub source: PathBuf,
    pub destination_root: PathBuf,
    pub split: DatasetSplit,
    pub group: String,
    pub file_name: String,
}

impl CopyJob {
    pub fn destination_dir(&self) -> PathBuf {
        self.destination_root
            .join(self.split.as_str())
            .join(&self.group)
    }

    pub fn destination_path(&self) -> PathBuf {
        self.destination_dir().join(&self.file_name)
    }
}

/// Everything needed to execute one batch: the directory that must exist
/// first, and one job per file.
#[derive(Debug, Clone)]
pub struct TransferPlan {
    pub split: DatasetSplit,
    pub group: String,
    pub destination_dir: PathBuf,
    pub jobs: Vec<CopyJob>,
}

impl TransferPlan {
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }
}

/// Build the copy plan for one (split, group) batch. No I/O happens here.
///
/// Files sharing a base name map to the same destination; whichever copy
/// runs last wins.
pub fn plan(
    destination_root: &Path,
    split: DatasetSplit,
    group: &str,
    files: &FilePopulation,
) -> TransferPlan {
    let destination_dir = destination_root.join(split.as_str()).join(group);

    let jobs = files
        .iter()
        .filter_map(|source| {
            let file_name = source.file_name()?.to_string_lossy().into_owned();
            Some(CopyJob {
                source: source.clone(),
                destination_root: destination_root.to_path_buf(),
                split,
                group: group.to_string(),
                file_name,
            })
        })
        .collect();

    TransferPlan {
        split,
        group: group.to_string(),
        destination_dir,
        jobs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_destination_layout() {
        let files = FilePopulation::from(vec![
            PathBuf::from("/data/cat/tabby/001.jpg"),
            PathBuf::from("/data/cat/tabby/deep/002.png"),
        ]);
        let plan = plan(Path::new("/out"), DatasetSplit::Train, "tabby", &files);

        assert_eq!(plan.destination_dir, PathBuf::from("/out/train/tabby"));
        assert_eq!(plan.len(), 2);
        assert_eq!(
            plan.jobs[1].destination_path(),
            PathBuf::from("/out/train/tabby/002.png")
        );
        assert!(plan
            .jobs
            .iter()
            .all(|job| job.destination_dir() == plan.destination_dir));
    }

    #[test]
    fn test_plan_does_no_io() {
        let files = FilePopulation::from(vec![PathBuf::from("/nowhere/x.bmp")]);
        let root = Path::new("/definitely/not/created");
        let plan = plan(root, DatasetSplit::Validation, "negative", &files);
        assert_eq!(
            plan.jobs[0].destination_path(),
            PathBuf::from("/definitely/not/created/validation/negative/x.bmp")
        );
        assert!(!root.exists());
    }

    #[test]
    fn test_plan_keeps_colliding_names() {
        let files = FilePopulation::from(vec![
            PathBuf::from("/data/a/same.jpg"),
            PathBuf::from("/data/b/same.jpg"),
        ]);
        let plan = plan(Path::new("/out"), DatasetSplit::Train, "positive", &files);
        assert_eq!(plan.len(), 2);
        assert_eq!(
            plan.jobs[0].destination_path(),
            plan.jobs[1].destination_path()
        );
    }

    #[test]
    fn test_plan_empty_population() {
        let plan = plan(
            Path::new("/out"),
            DatasetSplit::Train,
            "empty",
            &FilePopulation::new(),
        );
        assert!(plan.is_empty());
    }
}

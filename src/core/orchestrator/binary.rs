//! Binary (positive / negative) mode.
//!
//! All classes are pooled by tag first, balanced and split once, and exactly
//! four batches are copied. The minimum file count is not applied here:
//! every sub-class contributes to the pools regardless of size.

use std::path::{Path, PathBuf};

use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use super::summary::{BatchFailure, BatchSummary, ClassFailure, RunSummary};
use crate::config::SplitConfig;
use crate::core::dataset::{
    dir_name, list_eligible_files, list_subdirectories, DatasetSplit, FilePopulation, Layout,
};
use crate::core::operations::{execute_copy_batch, plan};
use crate::core::partition::{balance, split, BalanceError};
use crate::error::{DiscoveryError, RunError};

pub const POSITIVE_GROUP: &str = "positive";
pub const NEGATIVE_GROUP: &str = "negative";

pub(super) fn run_binary(
    config: &SplitConfig,
    class_dirs: &[PathBuf],
    rng: &mut ChaCha8Rng,
    summary: &mut RunSummary,
) -> Result<(), RunError> {
    let positive_class = config.positive_class().unwrap_or_default().to_string();
    info!("Collecting data for positive class '{}'", positive_class);
    info!("Binary mode: minimum file count is not applied, every sub-class is pooled");

    let mut positive = FilePopulation::new();
    let mut negative = FilePopulation::new();

    for class_dir in class_dirs {
        let class_name = dir_name(class_dir);
        let files = match collect_class_files(config.layout, class_dir) {
            Ok(files) => files,
            Err(e) => {
                warn!("Failed to collect files for class '{}': {}", class_name, e);
                summary.failed_classes.push(ClassFailure {
                    class: class_name,
                    message: e.to_string(),
                });
                continue;
            }
        };

        if files.is_empty() {
            warn!("Class '{}' has no usable image files", class_name);
            continue;
        }

        if class_name == positive_class {
            info!("  '{}' -> positive: {} files", class_name, files.len());
            positive.extend(files);
        } else {
            info!("  '{}' -> negative: {} files", class_name, files.len());
            negative.extend(files);
        }
    }

    info!("Positive files: {}", positive.len());
    info!("Negative files: {}", negative.len());

    let groups = balance(positive, negative, rng).map_err(|e| match e {
        BalanceError::EmptyPositiveClass => RunError::EmptyPositiveClass {
            class: positive_class.clone(),
        },
    })?;
    summary.target_count = Some(groups.target_count);
    info!(
        "Balanced to {} files per group ({} total)",
        groups.target_count,
        groups.target_count * 2
    );

    let positive_split = split(groups.positive, config.training_ratio, rng);
    let negative_split = split(groups.negative, config.training_ratio, rng);

    let batches = [
        (DatasetSplit::Train, POSITIVE_GROUP, &positive_split.training),
        (DatasetSplit::Validation, POSITIVE_GROUP, &positive_split.validation),
        (DatasetSplit::Train, NEGATIVE_GROUP, &negative_split.training),
        (DatasetSplit::Validation, NEGATIVE_GROUP, &negative_split.validation),
    ];

    info!("Copying positive/negative data");
    for (split_name, group, files) in batches {
        let batch = plan(&config.dest_dir, split_name, group, files);
        match execute_copy_batch(&batch, config.max_copy_workers) {
            Ok(outcome) => summary
                .batches
                .push(BatchSummary::from_outcome(group, &outcome)),
            Err(e) => {
                warn!("Failed to copy {} {} data: {}", group, split_name, e);
                summary.failed_batches.push(BatchFailure {
                    split: split_name,
                    group: group.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        "Binary dataset done. Train: positive {}, negative {}. Validation: positive {}, negative {}",
        positive_split.training.len(),
        negative_split.training.len(),
        positive_split.validation.len(),
        negative_split.validation.len()
    );
    Ok(())
}

/// All eligible files of one class, ignoring the minimum file count.
fn collect_class_files(layout: Layout, class_dir: &Path) -> Result<FilePopulation, DiscoveryError> {
    if layout == Layout::Flat {
        return list_eligible_files(class_dir);
    }

    let class_name = dir_name(class_dir);
    let mut pooled = FilePopulation::new();
    for subdir in list_subdirectories(class_dir)? {
        let group = dir_name(&subdir);
        match list_eligible_files(&subdir) {
            Ok(files) if files.is_empty() => {
                warn!("  '{}/{}' has no image files", class_name, group);
            }
            Ok(files) => pooled.extend(files),
            Err(e) => warn!("  Failed to list files in '{}/{}': {}", class_name, group, e),
        }
    }
    Ok(pooled)
}

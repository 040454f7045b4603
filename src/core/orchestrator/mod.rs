//! Run composition: discovery, partitioning and copying for a whole source tree.

mod binary;
mod per_class;
mod summary;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::config::SplitConfig;
use crate::core::dataset::list_subdirectories;
use crate::error::RunError;

pub use binary::{NEGATIVE_GROUP, POSITIVE_GROUP};
pub use summary::{
    BatchFailure, BatchSummary, ClassFailure, ClassReport, RunMode, RunSummary, SkipReason,
    SkippedPopulation, SummaryTotals,
};

/// Split the configured source tree into `<dest>/{train,validation}/<group>`.
///
/// Per-file and per-class failures are logged and recorded in the summary;
/// only configuration errors, an unreadable source root, an empty positive
/// class in binary mode, and (with `require_output`) an empty result end the
/// run with an error.
pub fn run(config: &SplitConfig) -> Result<RunSummary, RunError> {
    config.validate()?;
    config.check_source()?;

    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("Random seed: {}", seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let class_dirs = list_subdirectories(&config.source_dir)?;
    info!("Found {} class directories", class_dirs.len());

    let mode = if config.binary_mode {
        RunMode::Binary
    } else {
        RunMode::PerClass
    };
    let mut summary = RunSummary::new(mode, seed);
    summary.class_count = class_dirs.len();

    match mode {
        RunMode::Binary => binary::run_binary(config, &class_dirs, &mut rng, &mut summary)?,
        RunMode::PerClass => {
            for result in per_class::run_per_class(config, &class_dirs, &mut rng)? {
                match result {
                    Ok(report) => summary.absorb(report),
                    Err(failure) => summary.failed_classes.push(failure),
                }
            }
        }
    }
    summary.normalize();

    if summary.total_transferred() == 0 {
        warn!("No files were transferred");
        if config.require_output {
            return Err(RunError::NothingTransferred {
                failed_classes: summary.failed_classes.len(),
            });
        }
    }

    Ok(summary)
}

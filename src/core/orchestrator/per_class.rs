//! Independent per-class splitting, classes fanned out under a semaphore.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::{ThreadPoolBuildError, ThreadPoolBuilder};
use tracing::{info, warn};

use super::summary::{
    BatchFailure, BatchSummary, ClassFailure, ClassReport, SkipReason, SkippedPopulation,
};
use crate::config::SplitConfig;
use crate::core::dataset::{
    dir_name, list_eligible_files, list_subdirectories, DatasetSplit, FilePopulation, Layout,
};
use crate::core::operations::{execute_copy_batch, plan, Semaphore};
use crate::core::partition::split;
use crate::error::DiscoveryError;

type ClassResult = Result<ClassReport, ClassFailure>;

/// Process every class, at most `max_concurrent_classes` at a time.
pub(super) fn run_per_class(
    config: &SplitConfig,
    class_dirs: &[PathBuf],
    rng: &mut ChaCha8Rng,
) -> Result<Vec<ClassResult>, ThreadPoolBuildError> {
    run_per_class_with(config, class_dirs, rng, |class_dir, seed| {
        process_class(config, class_dir, seed)
    })
}

/// Run `process` once per class directory and return the results in class
/// order.
///
/// Child seeds are drawn from `rng` in class order before any task starts,
/// so results do not depend on scheduling. Classes run on a pool of
/// `max_concurrent_classes` threads and a task is only submitted once it
/// holds a class permit, so no more than that many class tasks exist at any
/// time. A panicking task becomes a `ClassFailure` in either mode.
pub(super) fn run_per_class_with<F>(
    config: &SplitConfig,
    class_dirs: &[PathBuf],
    rng: &mut ChaCha8Rng,
    process: F,
) -> Result<Vec<ClassResult>, ThreadPoolBuildError>
where
    F: Fn(&Path, u64) -> Result<ClassReport, DiscoveryError> + Sync,
{
    let seeds: Vec<u64> = class_dirs.iter().map(|_| rng.gen()).collect();

    if class_dirs.is_empty() {
        return Ok(Vec::new());
    }

    if config.max_concurrent_classes <= 1 {
        return Ok(class_dirs
            .iter()
            .zip(seeds)
            .map(|(class_dir, seed)| run_class_task(class_dir, seed, &process))
            .collect());
    }

    let workers = config.max_concurrent_classes.min(class_dirs.len());
    info!(
        "Processing {} classes, {} at a time",
        class_dirs.len(),
        workers
    );

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("class-{}", i))
        .build()?;
    let semaphore = Semaphore::new(workers);
    let (tx, rx) = mpsc::channel::<(usize, ClassResult)>();
    let process = &process;

    pool.in_place_scope(|s| {
        for (index, (class_dir, seed)) in class_dirs.iter().zip(seeds).enumerate() {
            let permit = semaphore.acquire();
            let tx = tx.clone();
            s.spawn(move |_| {
                let _permit = permit;
                let _ = tx.send((index, run_class_task(class_dir, seed, process)));
            });
        }
    });

    // The scope has joined every task, so all senders but this one are gone.
    drop(tx);
    let mut results: Vec<(usize, ClassResult)> = rx.into_iter().collect();
    results.sort_by_key(|(index, _)| *index);
    Ok(results.into_iter().map(|(_, result)| result).collect())
}

fn run_class_task<F>(class_dir: &Path, seed: u64, process: &F) -> ClassResult
where
    F: Fn(&Path, u64) -> Result<ClassReport, DiscoveryError>,
{
    let class_name = dir_name(class_dir);
    match panic::catch_unwind(AssertUnwindSafe(|| process(class_dir, seed))) {
        Ok(Ok(report)) => Ok(report),
        Ok(Err(e)) => {
            warn!("Failed to process class '{}': {}", class_name, e);
            Err(ClassFailure {
                class: class_name,
                message: e.to_string(),
            })
        }
        Err(payload) => {
            let message = format!("class task panicked: {}", panic_message(&*payload));
            warn!("Failed to process class '{}': {}", class_name, message);
            Err(ClassFailure {
                class: class_name,
                message,
            })
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Split and copy every population of one class.
pub(super) fn process_class(
    config: &SplitConfig,
    class_dir: &Path,
    seed: u64,
) -> Result<ClassReport, DiscoveryError> {
    let class_name = dir_name(class_dir);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut report = ClassReport::default();
    info!("Processing class '{}'", class_name);

    match config.layout {
        Layout::Flat => {
            let files = list_eligible_files(class_dir)?;
            process_population(config, &class_name, &class_name, files, false, &mut rng, &mut report);
        }
        Layout::Nested => {
            let subdirs = list_subdirectories(class_dir)?;
            if subdirs.is_empty() {
                warn!("Class '{}' has no sub-directories", class_name);
                return Ok(report);
            }
            info!("  {} sub-directories", subdirs.len());

            for subdir in subdirs {
                let group = dir_name(&subdir);
                let files = match list_eligible_files(&subdir) {
                    Ok(files) => files,
                    Err(e) => {
                        warn!("  Failed to list files in '{}/{}': {}", class_name, group, e);
                        report.skipped.push(SkippedPopulation {
                            class: class_name.clone(),
                            group,
                            file_count: 0,
                            reason: SkipReason::Unreadable,
                        });
                        continue;
                    }
                };
                process_population(config, &class_name, &group, files, true, &mut rng, &mut report);
            }
        }
    }

    Ok(report)
}

fn process_population(
    config: &SplitConfig,
    class_name: &str,
    group: &str,
    files: FilePopulation,
    apply_minimum: bool,
    rng: &mut ChaCha8Rng,
    report: &mut ClassReport,
) {
    let skip = |reason| SkippedPopulation {
        class: class_name.to_string(),
        group: group.to_string(),
        file_count: files.len(),
        reason,
    };

    if files.is_empty() {
        warn!("  '{}/{}' has no image files, skipping", class_name, group);
        report.skipped.push(skip(SkipReason::NoEligibleFiles));
        return;
    }
    if apply_minimum && files.len() < config.min_file_count {
        info!(
            "  Skipping '{}/{}': fewer than {} files ({} < {})",
            class_name,
            group,
            config.min_file_count,
            files.len(),
            config.min_file_count
        );
        report.skipped.push(skip(SkipReason::BelowMinimum));
        return;
    }

    info!("  '{}/{}': {} files", class_name, group, files.len());
    let result = split(files, config.training_ratio, rng);

    for (split_name, subset) in [
        (DatasetSplit::Train, &result.training),
        (DatasetSplit::Validation, &result.validation),
    ] {
        let batch = plan(&config.dest_dir, split_name, group, subset);
        match execute_copy_batch(&batch, config.max_copy_workers) {
            Ok(outcome) => report
                .batches
                .push(BatchSummary::from_outcome(class_name, &outcome)),
            Err(e) => {
                warn!("  Failed to copy {} data for '{}/{}': {}", split_name, class_name, group, e);
                report.failed_batches.push(BatchFailure {
                    split: split_name,
                    group: group.to_string(),
                    message: e.to_string(),
                });
                return;
            }
        }
    }

    info!(
        "  '{}/{}': {} train, {} validation",
        class_name,
        group,
        result.training.len(),
        result.validation.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    fn class_dirs(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("/data/class_{i:03}"))).collect()
    }

    fn config(max_concurrent_classes: usize) -> SplitConfig {
        SplitConfig {
            max_concurrent_classes,
            max_copy_workers: 1,
            ..SplitConfig::default()
        }
    }

    #[test]
    fn test_at_most_k_class_tasks_at_once() {
        let dirs = class_dirs(120);
        let running = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        let threads = Mutex::new(HashSet::new());

        let results = run_per_class_with(
            &config(3),
            &dirs,
            &mut ChaCha8Rng::seed_from_u64(5),
            |_dir, _seed| {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                threads.lock().unwrap().insert(thread::current().id());
                thread::sleep(Duration::from_millis(1));
                running.fetch_sub(1, Ordering::SeqCst);
                Ok(ClassReport::default())
            },
        )
        .unwrap();

        assert_eq!(results.len(), 120);
        assert!(results.iter().all(|r| r.is_ok()));
        assert!(peak.load(Ordering::SeqCst) <= 3);
        // Workers are a fixed set, not one thread per class
        assert!(threads.into_inner().unwrap().len() <= 3);
    }

    #[test]
    fn test_results_follow_class_order_and_seeds() {
        let dirs = class_dirs(12);
        let seen = |max_concurrent| {
            run_per_class_with(
                &config(max_concurrent),
                &dirs,
                &mut ChaCha8Rng::seed_from_u64(11),
                |dir, seed| {
                    Err(DiscoveryError::ReadDir {
                        path: dir.to_path_buf(),
                        source: std::io::Error::other(seed.to_string()),
                    })
                },
            )
            .unwrap()
            .into_iter()
            .map(|r| {
                let failure = r.unwrap_err();
                (failure.class, failure.message)
            })
            .collect::<Vec<_>>()
        };

        let sequential = seen(1);
        let concurrent = seen(4);
        assert_eq!(sequential, concurrent);
        assert_eq!(sequential[0].0, "class_000");
        assert_eq!(sequential[11].0, "class_011");
    }

    #[test]
    fn test_panicking_class_becomes_failure_in_both_modes() {
        let dirs = class_dirs(6);
        for max_concurrent in [1, 3] {
            let results = run_per_class_with(
                &config(max_concurrent),
                &dirs,
                &mut ChaCha8Rng::seed_from_u64(1),
                |dir, _seed| {
                    if dir.ends_with("class_002") {
                        panic!("corrupt class");
                    }
                    Ok(ClassReport::default())
                },
            )
            .unwrap();

            assert_eq!(results.len(), 6);
            let failures: Vec<&ClassFailure> =
                results.iter().filter_map(|r| r.as_ref().err()).collect();
            assert_eq!(failures.len(), 1, "max_concurrent = {}", max_concurrent);
            assert_eq!(failures[0].class, "class_002");
            assert!(failures[0].message.contains("corrupt class"));
        }
    }
}

//! Bounded, failure-isolating execution of copy batches.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info, warn};

use super::file_ops::{copy_file, ensure_dir};
use super::planner::{CopyJob, TransferPlan};
use super::semaphore::Semaphore;
use crate::core::dataset::DatasetSplit;
use crate::error::TransferError;

/// Lifecycle of a single copy job. There are no retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum JobState {
    Pending = 0,
    Running = 1,
    Succeeded = 2,
    Failed = 3,
}

impl JobState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => JobState::Running,
            2 => JobState::Succeeded,
            3 => JobState::Failed,
            _ => JobState::Pending,
        }
    }
}

/// One job that could not be copied.
#[derive(Debug, Clone)]
pub struct CopyFailure {
    /// Position of the job in the plan
    pub index: usize,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub message: String,
}

/// Aggregate result of one batch. A batch with failures is still a
/// completed batch; the caller decides whether that matters.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub split: DatasetSplit,
    pub group: String,
    pub job_states: Vec<JobState>,
    pub bytes_copied: u64,
    pub failures: Vec<CopyFailure>,
}

impl BatchOutcome {
    fn empty(plan: &TransferPlan) -> Self {
        Self {
            split: plan.split,
            group: plan.group.clone(),
            job_states: Vec::new(),
            bytes_copied: 0,
            failures: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.job_states.len()
    }

    pub fn succeeded(&self) -> usize {
        self.job_states
            .iter()
            .filter(|state| **state == JobState::Succeeded)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Execute a batch with the real file copier.
pub fn execute_copy_batch(
    plan: &TransferPlan,
    max_workers: usize,
) -> Result<BatchOutcome, TransferError> {
    execute_copy_batch_with(plan, max_workers, |job: &CopyJob| {
        copy_file(&job.source, &job.destination_path())
    })
}

/// Execute a batch with at most `max_workers` copies in flight.
///
/// The destination directory is created once before any job runs; failing
/// to create it aborts the batch with no job attempted. Individual copy
/// failures are logged and collected without stopping sibling jobs. With
/// `max_workers <= 1` jobs run in submission order on the calling thread,
/// otherwise on a pool of `min(max_workers, jobs)` threads owned by this batch.
pub fn execute_copy_batch_with<F>(
    plan: &TransferPlan,
    max_workers: usize,
    copier: F,
) -> Result<BatchOutcome, TransferError>
where
    F: Fn(&CopyJob) -> io::Result<u64> + Sync,
{
    if plan.is_empty() {
        return Ok(BatchOutcome::empty(plan));
    }

    ensure_dir(&plan.destination_dir)?;

    let states: Vec<AtomicU8> = plan
        .jobs
        .iter()
        .map(|_| AtomicU8::new(JobState::Pending as u8))
        .collect();

    let results: Vec<Result<u64, CopyFailure>> = if max_workers <= 1 {
        plan.jobs
            .iter()
            .enumerate()
            .map(|(index, job)| run_job(index, job, &copier, &states))
            .collect()
    } else {
        let workers = max_workers.min(plan.len());
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("copy-{}", i))
            .build()?;
        let semaphore = Semaphore::new(max_workers);
        debug!(
            "Copying {} files into {:?} with {} workers",
            plan.len(),
            plan.destination_dir,
            workers
        );

        pool.install(|| {
            plan.jobs
                .par_iter()
                .enumerate()
                .map(|(index, job)| {
                    let _permit = semaphore.acquire();
                    run_job(index, job, &copier, &states)
                })
                .collect()
        })
    };

    let mut bytes_copied = 0;
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(copied) => bytes_copied += copied,
            Err(failure) => failures.push(failure),
        }
    }

    let outcome = BatchOutcome {
        split: plan.split,
        group: plan.group.clone(),
        job_states: states
            .iter()
            .map(|state| JobState::from_u8(state.load(Ordering::SeqCst)))
            .collect(),
        bytes_copied,
        failures,
    };

    if outcome.is_success() {
        info!(
            "Copied {} files to {:?}",
            outcome.succeeded(),
            plan.destination_dir
        );
    } else {
        warn!(
            "{} of {} copies into {:?} failed",
            outcome.failed(),
            outcome.total(),
            plan.destination_dir
        );
    }

    Ok(outcome)
}

fn run_job<F>(
    index: usize,
    job: &CopyJob,
    copier: &F,
    states: &[AtomicU8],
) -> Result<u64, CopyFailure>
where
    F: Fn(&CopyJob) -> io::Result<u64>,
{
    states[index].store(JobState::Running as u8, Ordering::SeqCst);
    match copier(job) {
        Ok(copied) => {
            states[index].store(JobState::Succeeded as u8, Ordering::SeqCst);
            Ok(copied)
        }
        Err(e) => {
            let destination = job.destination_path();
            warn!(
                "Failed to copy {:?} -> {:?}: {}",
                job.source, destination, e
            );
            states[index].store(JobState::Failed as u8, Ordering::SeqCst);
            Err(CopyFailure {
                index,
                source: job.source.clone(),
                destination,
                message: e.to_string(),
            })
        }
    }
}

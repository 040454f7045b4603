mod executor;
mod file_ops;
mod planner;
mod semaphore;

pub use executor::{
    execute_copy_batch, execute_copy_batch_with, BatchOutcome, CopyFailure, JobState,
};
pub use file_ops::{copy_file, ensure_dir};
pub use planner::{plan, CopyJob, TransferPlan};
pub use semaphore::{Semaphore, SemaphorePermit};

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::core::dataset::DatasetSplit;
use crate::core::operations::BatchOutcome;
use crate::error::RunError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    PerClass,
    Binary,
}

/// Counts for one (split, group) batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub class: String,
    pub split: DatasetSplit,
    pub group: String,
    pub transferred: usize,
    pub failed: usize,
    pub bytes: u64,
}

impl BatchSummary {
    pub fn from_outcome(class: &str, outcome: &BatchOutcome) -> Self {
        Self {
            class: class.to_string(),
            split: outcome.split,
            group: outcome.group.clone(),
            transferred: outcome.succeeded(),
            failed: outcome.failed(),
            bytes: outcome.bytes_copied,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoEligibleFiles,
    BelowMinimum,
    Unreadable,
}

/// A population that contributed nothing to either split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPopulation {
    pub class: String,
    pub group: String,
    pub file_count: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassFailure {
    pub class: String,
    pub message: String,
}

/// A batch whose destination directory could not be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub split: DatasetSplit,
    pub group: String,
    pub message: String,
}

/// What a single class task produced.
#[derive(Debug, Clone, Default)]
pub struct ClassReport {
    pub batches: Vec<BatchSummary>,
    pub skipped: Vec<SkippedPopulation>,
    pub failed_batches: Vec<BatchFailure>,
}

/// Run-wide counts, filled in by `RunSummary::normalize`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryTotals {
    pub transferred: usize,
    pub failed: usize,
    pub bytes: u64,
    pub skipped: usize,
}

/// Final report of a run, logged at the end and optionally saved as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub mode: RunMode,
    pub seed: u64,
    pub class_count: usize,
    /// Balanced size per group, binary mode only
    pub target_count: Option<usize>,
    pub batches: Vec<BatchSummary>,
    pub skipped: Vec<SkippedPopulation>,
    pub failed_classes: Vec<ClassFailure>,
    pub failed_batches: Vec<BatchFailure>,
    pub totals: SummaryTotals,
}

impl RunSummary {
    pub fn new(mode: RunMode, seed: u64) -> Self {
        Self {
            mode,
            seed,
            class_count: 0,
            target_count: None,
            batches: Vec::new(),
            skipped: Vec::new(),
            failed_classes: Vec::new(),
            failed_batches: Vec::new(),
            totals: SummaryTotals::default(),
        }
    }

    pub fn absorb(&mut self, report: ClassReport) {
        self.batches.extend(report.batches);
        self.skipped.extend(report.skipped);
        self.failed_batches.extend(report.failed_batches);
    }

    pub fn total_transferred(&self) -> usize {
        self.batches.iter().map(|b| b.transferred).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.batches.iter().map(|b| b.failed).sum()
    }

    /// Files transferred into `<split>/<group>`, summed over classes.
    pub fn transferred_for(&self, split: DatasetSplit, group: &str) -> usize {
        self.batches
            .iter()
            .filter(|b| b.split == split && b.group == group)
            .map(|b| b.transferred)
            .sum()
    }

    /// Sort everything by name so the report does not depend on scheduling,
    /// and recompute the totals.
    pub fn normalize(&mut self) {
        self.totals = SummaryTotals {
            transferred: self.total_transferred(),
            failed: self.total_failed(),
            bytes: self.batches.iter().map(|b| b.bytes).sum(),
            skipped: self.skipped.len(),
        };
        self.batches.sort_by(|a, b| {
            (&a.class, &a.group, a.split.as_str()).cmp(&(&b.class, &b.group, b.split.as_str()))
        });
        self.skipped
            .sort_by(|a, b| (&a.class, &a.group).cmp(&(&b.class, &b.group)));
        self.failed_classes.sort_by(|a, b| a.class.cmp(&b.class));
    }

    pub fn log(&self) {
        info!(
            "Summary: {} files transferred, {} copy failures, {} populations skipped",
            self.total_transferred(),
            self.total_failed(),
            self.skipped.len()
        );
        for batch in &self.batches {
            info!(
                "  {}/{} (class '{}'): {} transferred, {} failed",
                batch.split, batch.group, batch.class, batch.transferred, batch.failed
            );
        }
        for skipped in &self.skipped {
            info!(
                "  skipped {}/{} ({} files): {:?}",
                skipped.class, skipped.group, skipped.file_count, skipped.reason
            );
        }
        for failure in &self.failed_classes {
            warn!("  class '{}' failed: {}", failure.class, failure.message);
        }
        for failure in &self.failed_batches {
            warn!(
                "  batch {}/{} failed: {}",
                failure.split, failure.group, failure.message
            );
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<(), RunError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| RunError::Summary {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        fs::write(path, json).map_err(|source| RunError::Summary {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Summary written to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(class: &str, split: DatasetSplit, group: &str, n: usize) -> BatchSummary {
        BatchSummary {
            class: class.to_string(),
            split,
            group: group.to_string(),
            transferred: n,
            failed: 0,
            bytes: 0,
        }
    }

    #[test]
    fn test_totals_and_group_lookup() {
        let mut summary = RunSummary::new(RunMode::PerClass, 1);
        summary.absorb(ClassReport {
            batches: vec![
                batch("cat", DatasetSplit::Train, "sub1", 48),
                batch("cat", DatasetSplit::Validation, "sub1", 12),
                batch("dog", DatasetSplit::Train, "sub1", 5),
            ],
            ..ClassReport::default()
        });

        assert_eq!(summary.total_transferred(), 65);
        assert_eq!(summary.transferred_for(DatasetSplit::Train, "sub1"), 53);
        assert_eq!(summary.transferred_for(DatasetSplit::Validation, "sub2"), 0);
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let mut summary = RunSummary::new(RunMode::Binary, 42);
        summary.target_count = Some(30);
        summary.batches.push(batch("defect", DatasetSplit::Train, "positive", 21));

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["mode"], "binary");
        assert_eq!(value["seed"], 42);
        assert_eq!(value["batches"][0]["split"], "train");
        assert_eq!(value["batches"][0]["transferred"], 21);
    }

    #[test]
    fn test_normalize_fills_serialized_totals() {
        let mut summary = RunSummary::new(RunMode::PerClass, 3);
        let mut partial = batch("cat", DatasetSplit::Validation, "sub1", 11);
        partial.failed = 1;
        partial.bytes = 110;
        summary.absorb(ClassReport {
            batches: vec![batch("cat", DatasetSplit::Train, "sub1", 48), partial],
            skipped: vec![SkippedPopulation {
                class: "dog".to_string(),
                group: "sub1".to_string(),
                file_count: 40,
                reason: SkipReason::BelowMinimum,
            }],
            ..ClassReport::default()
        });
        summary.normalize();

        assert_eq!(summary.totals.transferred, 59);
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["totals"]["transferred"], 59);
        assert_eq!(value["totals"]["failed"], 1);
        assert_eq!(value["totals"]["bytes"], 110);
        assert_eq!(value["totals"]["skipped"], 1);
    }
}

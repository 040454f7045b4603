//! Positive/negative balancing for binary mode.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::core::dataset::FilePopulation;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BalanceError {
    #[error("Positive population is empty")]
    EmptyPositiveClass,
}

/// Both populations cut down to `target_count` files each.
#[derive(Debug, Clone)]
pub struct BalancedGroups {
    pub positive: FilePopulation,
    pub negative: FilePopulation,
    pub target_count: usize,
}

/// Size both groups are truncated to: the smaller of the two.
pub fn target_count(positive: usize, negative: usize) -> usize {
    positive.min(negative)
}

/// Shuffle each population independently and keep the first `target_count`.
///
/// An empty negative pool is allowed and yields a target of zero. The two
/// truncations are independent, so small sub-classes pooled into the
/// negative side are not guaranteed proportional representation.
pub fn balance<R: Rng + ?Sized>(
    positive: FilePopulation,
    negative: FilePopulation,
    rng: &mut R,
) -> Result<BalancedGroups, BalanceError> {
    if positive.is_empty() {
        return Err(BalanceError::EmptyPositiveClass);
    }

    let target = target_count(positive.len(), negative.len());

    Ok(BalancedGroups {
        positive: shuffle_truncate(positive, target, rng),
        negative: shuffle_truncate(negative, target, rng),
        target_count: target,
    })
}

fn shuffle_truncate<R: Rng + ?Sized>(
    population: FilePopulation,
    count: usize,
    rng: &mut R,
) -> FilePopulation {
    let mut files = population.into_vec();
    files.shuffle(rng);
    files.truncate(count);
    FilePopulation::from(files)
}

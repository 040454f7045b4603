use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::dataset::FilePopulation;

/// A disjoint train/validation partition of one population.
#[derive(Debug, Clone, Default)]
pub struct SplitResult {
    pub training: FilePopulation,
    pub validation: FilePopulation,
}

/// Index at which a shuffled population of `len` files is cut.
///
/// `floor(len * ratio)`, clamped into `0..=len`.
pub fn split_point(len: usize, ratio: f64) -> usize {
    ((len as f64) * ratio).floor().clamp(0.0, len as f64) as usize
}

/// Shuffle `files` uniformly and cut it into training and validation sets.
///
/// The ratio is validated once with the rest of the configuration, so it is
/// not rechecked here. Empty training or validation sets are valid results
/// for small populations.
pub fn split<R: Rng + ?Sized>(files: FilePopulation, ratio: f64, rng: &mut R) -> SplitResult {
    let mut shuffled = files.into_vec();
    shuffled.shuffle(rng);

    let cut = split_point(shuffled.len(), ratio);
    let validation = shuffled.split_off(cut);

    SplitResult {
        training: FilePopulation::from(shuffled),
        validation: FilePopulation::from(validation),
    }
}

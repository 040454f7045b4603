//! Random train/validation partitioning and binary-mode balancing.

mod balance;
mod split;

pub use balance::{balance, target_count, BalanceError, BalancedGroups};
pub use split::{split, split_point, SplitResult};

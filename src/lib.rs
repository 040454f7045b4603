//! Split class-organized image folders into train/validation trees.
//!
//! The source tree is `<root>/<class>/<sub-class>/...` (or `<root>/<class>/...`
//! with the flat layout). Each population is shuffled and cut at the
//! configured ratio, or, in binary mode, pooled into positive/negative groups
//! and balanced first. Files are copied to `<dest>/{train,validation}/<group>`
//! with bounded concurrency at both the class and the file level.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;

pub use crate::config::SplitConfig;
pub use crate::core::orchestrator::{run, RunSummary};
pub use crate::error::RunError;

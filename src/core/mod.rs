pub mod archive;
pub mod dataset;
pub mod operations;
pub mod orchestrator;
pub mod partition;

pub use archive::*;
pub use dataset::*;
pub use operations::*;
pub use orchestrator::*;
pub use partition::*;

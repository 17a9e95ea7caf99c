pub mod constants;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use filename::{partition_path, results_path};
pub use progress::ProgressReporter;

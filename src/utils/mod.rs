pub mod constants;
pub mod paths;
pub mod progress;

pub use constants::*;
pub use paths::{dataset_path, temperature_fallback_path, temperature_path};
pub use progress::ProgressReporter;

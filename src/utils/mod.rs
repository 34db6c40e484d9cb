pub mod constants;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use filename::{daily_filename, report_filename};
pub use progress::ProgressReporter;

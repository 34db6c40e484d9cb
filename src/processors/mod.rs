pub mod day_partitioner;
pub mod grid_reconciler;
pub mod qa_flagger;
pub mod run_processor;
pub mod wind_chill;

pub use day_partitioner::{DayPartitioner, DayView};
pub use grid_reconciler::{GridReconciler, MergeStats};
pub use qa_flagger::{QaFlagger, QaSummary};
pub use run_processor::{RunContext, RunProcessor, RunSummary};
pub use wind_chill::{wind_chill, WindChillCalculator};

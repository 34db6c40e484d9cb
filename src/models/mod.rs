pub mod observation;
pub mod qa_rule;
pub mod statistics;
pub mod window;

pub use observation::{ObservationRow, ObservationSeries, Reading, Variable};
pub use qa_rule::{QaRule, QaRules};
pub use statistics::{format_statistic, DailyStatistics, SummaryStats};
pub use window::{DayWindow, RunWindow};

use crate::models::{DailyStatistics, SummaryStats, Variable};
use crate::processors::DayView;
use crate::utils::constants::EXPECTED_DAILY_OBSERVATIONS;

/// Per-day statistics over available values only. Absent and QA-failed cells
/// never contribute; they are not sentinel numbers here.
pub struct DailyAnalyzer {
    expected_observations: usize,
}

impl DailyAnalyzer {
    pub fn new() -> Self {
        Self {
            expected_observations: EXPECTED_DAILY_OBSERVATIONS,
        }
    }

    pub fn analyze(&self, view: &DayView<'_>) -> DailyStatistics {
        let wind_chill = view
            .has_column(Variable::WindChill)
            .then(|| SummaryStats::from_values(view.values(Variable::WindChill)));

        DailyStatistics {
            date: view.date(),
            missing_observations: self.missing_observations(view),
            air_temperature: SummaryStats::from_values(view.values(Variable::AirTemperature)),
            wind_speed: SummaryStats::from_values(view.values(Variable::WindSpeed)),
            wind_chill,
            total_rainfall: self.total_rainfall(view),
        }
    }

    /// Expected samples minus rows that had a raw record; QA rejections do not count.
    pub fn missing_observations(&self, view: &DayView<'_>) -> usize {
        self.expected_observations
            .saturating_sub(view.raw_backed_rows())
    }

    /// The logger reports a running daily total, so the day's total is its maximum.
    pub fn total_rainfall(&self, view: &DayView<'_>) -> Option<f64> {
        view.values(Variable::Rainfall).reduce(f64::max)
    }
}

impl Default for DailyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

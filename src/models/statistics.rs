use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::constants::UNDEFINED_STATISTIC;

/// Max/min/mean over the available values of one variable for one day.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub mean: Option<f64>,
    pub count: usize,
}

impl SummaryStats {
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        let mut sum = 0.0f64;
        let mut count = 0usize;

        for value in values {
            max = max.max(value);
            min = min.min(value);
            sum += value;
            count += 1;
        }

        if count == 0 {
            return Self::default();
        }

        Self {
            max: Some(max),
            min: Some(min),
            mean: Some(sum / count as f64),
            count,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.count > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStatistics {
    pub date: NaiveDate,
    pub missing_observations: usize,
    pub air_temperature: SummaryStats,
    pub wind_speed: SummaryStats,
    /// Only when the run derived wind chill
    pub wind_chill: Option<SummaryStats>,
    /// Maximum of the accumulated rainfall column
    pub total_rainfall: Option<f64>,
}

impl DailyStatistics {
    pub fn has_no_data(&self) -> bool {
        !self.air_temperature.is_defined()
            && !self.wind_speed.is_defined()
            && self.total_rainfall.is_none()
            && self.wind_chill.map_or(true, |s| !s.is_defined())
    }
}

/// Fixed-width (8) two-decimal rendering; undefined renders as the placeholder.
pub fn format_statistic(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:8.2}", v),
        None => format!("{:>8}", UNDEFINED_STATISTIC),
    }
}

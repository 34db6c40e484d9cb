use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    DAY_END_HOUR, DAY_END_MINUTE, FILE_DATE_FORMAT, SAMPLE_INTERVAL_MINUTES,
    SETTINGS_TIMESTAMP_FORMAT,
};

/// Inclusive run window at minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl RunWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start > end {
            return Err(ProcessingError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse `%Y-%m-%d %H:%M` bounds as they appear in settings
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = NaiveDateTime::parse_from_str(start.trim(), SETTINGS_TIMESTAMP_FORMAT)?;
        let end = NaiveDateTime::parse_from_str(end.trim(), SETTINGS_TIMESTAMP_FORMAT)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }

    pub fn interval() -> Duration {
        Duration::minutes(SAMPLE_INTERVAL_MINUTES)
    }

    /// Number of grid timestamps: floor(duration / interval) + 1
    pub fn grid_len(&self) -> usize {
        let minutes = (self.end - self.start).num_minutes();
        (minutes / SAMPLE_INTERVAL_MINUTES) as usize + 1
    }

    /// Expected timestamps, ascending, start-aligned.
    pub fn grid(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        let step = Self::interval();
        (0..self.grid_len()).map(move |i| self.start + step * i as i32)
    }

    /// Whether `timestamp` sits on the grid (inside the window and aligned to start).
    pub fn is_on_grid(&self, timestamp: NaiveDateTime) -> bool {
        if !self.contains(timestamp) {
            return false;
        }
        let offset = timestamp - self.start;
        offset.num_seconds() % (SAMPLE_INTERVAL_MINUTES * 60) == 0
    }

    /// Every calendar day whose [00:00, 23:55] window intersects the run.
    pub fn days(&self) -> Vec<DayWindow> {
        let mut days = Vec::new();
        let mut date = self.start.date();
        let last = self.end.date();

        while date <= last {
            let day = DayWindow::new(date);
            if day.start() <= self.end && day.end() >= self.start {
                days.push(day);
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }

        days
    }

    /// `YYYYMMDD_YYYYMMDD` label for run-level artifacts
    pub fn file_label(&self) -> String {
        format!(
            "{}_{}",
            self.start.format(FILE_DATE_FORMAT),
            self.end.format(FILE_DATE_FORMAT)
        )
    }
}

/// One calendar date's [00:00, 23:55] sub-range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayWindow {
    date: NaiveDate,
}

impl DayWindow {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN)
    }

    /// 23:55, the last scheduled sample; 23:55 < t < 24:00 is outside every day.
    pub fn end(&self) -> NaiveDateTime {
        let end = NaiveTime::from_hms_opt(DAY_END_HOUR, DAY_END_MINUTE, 0).unwrap_or(NaiveTime::MIN);
        self.date.and_time(end)
    }

    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp >= self.start() && timestamp <= self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn dt(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 2, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_invalid_window() {
        let err = RunWindow::new(dt(3, 0, 0), dt(1, 0, 0)).unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidWindow { .. }));
    }

    #[test]
    fn test_parse_window() {
        let window = RunWindow::parse("2021-02-01 00:00", "2021-02-03 23:55").unwrap();
        assert_eq!(window.start(), dt(1, 0, 0));
        assert_eq!(window.end(), dt(3, 23, 55));
        assert!(RunWindow::parse("2021-02-01", "2021-02-03 23:55").is_err());
    }

    #[test]
    fn test_grid_len_and_spacing() {
        let window = RunWindow::new(dt(1, 0, 0), dt(3, 23, 55)).unwrap();
        assert_eq!(window.grid_len(), 864);

        let grid: Vec<_> = window.grid().collect();
        assert_eq!(grid.len(), 864);
        assert_eq!(grid[0], dt(1, 0, 0));
        assert_eq!(grid[863], dt(3, 23, 55));
        assert!(grid.windows(2).all(|w| w[1] - w[0] == Duration::minutes(5)));
    }

    #[test]
    fn test_single_instant_window() {
        let window = RunWindow::new(dt(1, 12, 0), dt(1, 12, 0)).unwrap();
        assert_eq!(window.grid_len(), 1);
        assert_eq!(window.days().len(), 1);
    }

    #[test]
    fn test_on_grid() {
        let window = RunWindow::new(dt(1, 0, 0), dt(1, 23, 55)).unwrap();
        assert!(window.is_on_grid(dt(1, 0, 5)));
        assert!(!window.is_on_grid(dt(1, 0, 3)));
        assert!(!window.is_on_grid(dt(2, 0, 0)));
    }

    #[test]
    fn test_days_include_partial_edges() {
        let window = RunWindow::new(dt(1, 12, 0), dt(3, 6, 0)).unwrap();
        let dates: Vec<_> = window.days().iter().map(|d| d.date().day()).collect();
        assert_eq!(dates, vec![1, 2, 3]);
    }

    #[test]
    fn test_day_starting_after_last_sample_is_skipped() {
        // 23:57 is past the day's 23:55 end
        let window = RunWindow::new(dt(1, 23, 57), dt(2, 1, 0)).unwrap();
        let days = window.days();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date(), NaiveDate::from_ymd_opt(2021, 2, 2).unwrap());
    }

    #[test]
    fn test_day_window_bounds() {
        let day = DayWindow::new(NaiveDate::from_ymd_opt(2021, 2, 1).unwrap());
        assert!(day.contains(dt(1, 0, 0)));
        assert!(day.contains(dt(1, 23, 55)));
        assert!(!day.contains(dt(1, 23, 57)));
        assert!(!day.contains(dt(2, 0, 0)));
    }

    #[test]
    fn test_file_label() {
        let window = RunWindow::new(dt(1, 0, 0), dt(3, 23, 55)).unwrap();
        assert_eq!(window.file_label(), "20210201_20210203");
    }
}

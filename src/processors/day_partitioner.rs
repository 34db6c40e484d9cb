use crate::models::{DayWindow, ObservationRow, ObservationSeries, RunWindow, Variable};
use chrono::NaiveDate;

/// Read-only slice of the series for one calendar day.
#[derive(Debug, Clone, Copy)]
pub struct DayView<'a> {
    pub day: DayWindow,
    pub rows: &'a [ObservationRow],
    pub columns: &'a [Variable],
}

impl<'a> DayView<'a> {
    pub fn date(&self) -> NaiveDate {
        self.day.date()
    }

    pub fn has_column(&self, variable: Variable) -> bool {
        self.columns.contains(&variable)
    }

    pub fn raw_backed_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.raw_backed).count()
    }

    /// Available values of one variable, in time order
    pub fn values(&self, variable: Variable) -> impl Iterator<Item = f64> + 'a {
        let rows = self.rows;
        rows.iter().filter_map(move |r| r.get(variable).value())
    }
}

pub struct DayPartitioner;

impl DayPartitioner {
    pub fn new() -> Self {
        Self
    }

    /// One view per calendar day touched by the window, ascending. The series
    /// must be sorted by timestamp, as the grid reconciler produces it.
    pub fn partition<'a>(&self, window: &RunWindow, series: &'a ObservationSeries) -> Vec<DayView<'a>> {
        window
            .days()
            .into_iter()
            .map(|day| self.slice(day, series))
            .collect()
    }

    pub fn slice<'a>(&self, day: DayWindow, series: &'a ObservationSeries) -> DayView<'a> {
        let rows = series.rows();
        let lo = rows.partition_point(|r| r.timestamp < day.start());
        let hi = rows.partition_point(|r| r.timestamp <= day.end());

        DayView {
            day,
            rows: &rows[lo..hi.max(lo)],
            columns: series.columns(),
        }
    }
}

impl Default for DayPartitioner {
    fn default() -> Self {
        Self::new()
    }
}

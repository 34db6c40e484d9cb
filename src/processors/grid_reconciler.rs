use crate::error::Result;
use crate::models::{ObservationRow, ObservationSeries, RunWindow};
use crate::utils::constants::SAMPLE_INTERVAL_MINUTES;
use chrono::NaiveDateTime;
use tracing::{info, warn};

/// Outcome of merging raw records onto the grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub raw_records: usize,
    pub matched: usize,
    pub duplicates: usize,
    pub outside_window: usize,
    pub off_grid: usize,
    pub grid_len: usize,
}

impl MergeStats {
    /// Grid slots with no raw record behind them
    pub fn gaps(&self) -> usize {
        self.grid_len.saturating_sub(self.matched)
    }
}

/// Places raw records onto the fixed 5-minute grid of a run window.
pub struct GridReconciler;

impl GridReconciler {
    pub fn new() -> Self {
        Self
    }

    /// Same as [`reconcile`](Self::reconcile) for unchecked bounds.
    pub fn reconcile_between(
        &self,
        raw: &[ObservationRow],
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<(ObservationSeries, MergeStats)> {
        let window = RunWindow::new(start, end)?;
        Ok(self.reconcile(raw, &window))
    }

    /// Every grid timestamp appears exactly once, ascending. Raw records are keyed
    /// by timestamp, so input order does not matter; duplicates resolve last-wins.
    pub fn reconcile(
        &self,
        raw: &[ObservationRow],
        window: &RunWindow,
    ) -> (ObservationSeries, MergeStats) {
        let mut rows: Vec<ObservationRow> = window.grid().map(ObservationRow::absent).collect();
        let mut filled = vec![false; rows.len()];
        let mut stats = MergeStats {
            raw_records: raw.len(),
            grid_len: rows.len(),
            ..MergeStats::default()
        };

        for record in raw {
            if !window.contains(record.timestamp) {
                stats.outside_window += 1;
                continue;
            }
            if !window.is_on_grid(record.timestamp) {
                stats.off_grid += 1;
                continue;
            }

            let index =
                ((record.timestamp - window.start()).num_minutes() / SAMPLE_INTERVAL_MINUTES) as usize;
            if filled[index] {
                stats.duplicates += 1;
            } else {
                filled[index] = true;
                stats.matched += 1;
            }
            rows[index] = record.clone();
        }

        info!(
            "Reconciled {} raw records onto {} grid slots ({} matched, {} gaps)",
            stats.raw_records,
            stats.grid_len,
            stats.matched,
            stats.gaps()
        );
        if stats.duplicates > 0 {
            warn!("{} duplicate timestamps, keeping the last occurrence", stats.duplicates);
        }
        if stats.off_grid > 0 {
            warn!("{} records fall between grid points and were dropped", stats.off_grid);
        }

        (ObservationSeries::new(rows), stats)
    }
}

impl Default for GridReconciler {
    fn default() -> Self {
        Self::new()
    }
}

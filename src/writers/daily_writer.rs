use crate::error::Result;
use crate::processors::DayView;
use crate::utils::constants::{OUTPUT_TIMESTAMP_FORMAT, TIMESTAMP_COLUMN};
use crate::utils::filename::{daily_filename, daily_path};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes one delimited file per day, absent and QA-failed cells as -9999.
pub struct DailyFileWriter {
    station_prefix: String,
}

impl DailyFileWriter {
    pub fn new(station_prefix: impl Into<String>) -> Self {
        Self {
            station_prefix: station_prefix.into(),
        }
    }

    /// Header plus one line per grid row; columns follow the series.
    pub fn write_day<W: Write>(&self, view: &DayView<'_>, writer: W) -> Result<usize> {
        let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);

        let mut header = Vec::with_capacity(view.columns.len() + 1);
        header.push(TIMESTAMP_COLUMN);
        header.extend(view.columns.iter().map(|v| v.code()));
        csv_writer.write_record(&header)?;

        for row in view.rows {
            let mut record = Vec::with_capacity(view.columns.len() + 1);
            record.push(row.timestamp.format(OUTPUT_TIMESTAMP_FORMAT).to_string());
            record.extend(view.columns.iter().map(|v| row.get(*v).to_file_cell()));
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(view.rows.len())
    }

    /// Create (or truncate) the day's file under `dir`.
    pub fn write_day_file(&self, view: &DayView<'_>, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = daily_path(dir, &self.station_prefix, view.date());

        let file = File::create(&path)?;
        let rows = self.write_day(view, BufWriter::new(file))?;

        debug!("Wrote {} rows to {}", rows, path.display());
        Ok(path)
    }

    pub fn filename_for(&self, view: &DayView<'_>) -> String {
        daily_filename(&self.station_prefix, view.date())
    }
}

use crate::models::RunWindow;
use crate::utils::constants::{DAY_FILE_EXTENSION, FILE_DATE_FORMAT, REPORT_FILE_EXTENSION};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Daily file name with format: {prefix}_{YYYYMMDD}.dat
pub fn daily_filename(station_prefix: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}.{}",
        station_prefix,
        date.format(FILE_DATE_FORMAT),
        DAY_FILE_EXTENSION
    )
}

/// Report file name with format: {prefix}_REPORT_{YYYYMMDD}_{YYYYMMDD}.txt
pub fn report_filename(report_prefix: &str, window: &RunWindow) -> String {
    format!(
        "{}_REPORT_{}.{}",
        report_prefix,
        window.file_label(),
        REPORT_FILE_EXTENSION
    )
}

pub fn daily_path(dir: &Path, station_prefix: &str, date: NaiveDate) -> PathBuf {
    dir.join(daily_filename(station_prefix, date))
}

pub fn report_path(dir: &Path, report_prefix: &str, window: &RunWindow) -> PathBuf {
    dir.join(report_filename(report_prefix, window))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_filename() {
        let date = NaiveDate::from_ymd_opt(2021, 2, 1).unwrap();
        assert_eq!(daily_filename("NWC", date), "NWC_20210201.dat");
        assert_eq!(
            daily_path(Path::new("out"), "NWC", date),
            PathBuf::from("out").join("NWC_20210201.dat")
        );
    }

    #[test]
    fn test_report_filename() {
        let window = RunWindow::parse("2021-02-01 00:00", "2021-02-03 23:55").unwrap();
        assert_eq!(
            report_filename("NWC0", &window),
            "NWC0_REPORT_20210201_20210203.txt"
        );
    }
}

use crate::analyzers::DailyAnalyzer;
use crate::error::{ProcessingError, Result};
use crate::models::{DailyStatistics, ObservationSeries, RunWindow, Variable};
use crate::processors::{
    DayPartitioner, GridReconciler, MergeStats, QaFlagger, QaSummary, WindChillCalculator,
};
use crate::readers::{LoggerReader, RawTable};
use crate::settings::Settings;
use crate::utils::filename::report_path;
use crate::utils::progress::ProgressReporter;
use crate::writers::{DailyFileWriter, ReportAccumulator};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Everything one run needs, built once before any output is written.
///
/// The series is reconciled, QA-flagged and (optionally) extended with wind
/// chill here; afterwards it is only read.
#[derive(Debug)]
pub struct RunContext {
    pub settings: Settings,
    pub window: RunWindow,
    pub series: ObservationSeries,
    pub merge_stats: MergeStats,
    pub qa_summary: QaSummary,
    pub station_name: Option<String>,
}

impl RunContext {
    /// Read the raw file named in settings and prepare the series
    pub fn load(settings: Settings) -> Result<Self> {
        let raw = LoggerReader::new().read_file(&settings.data_file())?;
        Self::prepare(settings, raw)
    }

    pub fn prepare(settings: Settings, raw: RawTable) -> Result<Self> {
        let window = settings.run_window()?;
        let flagger = QaFlagger::new(settings.qa_rules()?);

        let (mut series, merge_stats) = GridReconciler::new().reconcile(&raw.rows, &window);
        let mut qa_summary = flagger.apply(&mut series);

        if settings.wind_chill {
            let chill_summary = WindChillCalculator::new().derive_and_flag(&mut series, &flagger);
            qa_summary.merge(chill_summary);
        } else if flagger.rules().get(Variable::WindChill).is_some() {
            warn!("CHIL QA limits configured but wind chill is disabled");
        }

        Ok(Self {
            settings,
            window,
            series,
            merge_stats,
            qa_summary,
            station_name: raw.station_name,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub days: usize,
    pub rows_written: usize,
    pub daily_files: Vec<PathBuf>,
    pub report_path: PathBuf,
    pub empty_days: Vec<NaiveDate>,
    pub qa_flagged: usize,
}

impl RunSummary {
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Days processed: {}\nRows written: {}\nQA-failed values: {}\nReport: {}",
            self.days,
            self.rows_written,
            self.qa_flagged,
            self.report_path.display()
        );
        if !self.empty_days.is_empty() {
            let dates: Vec<String> = self.empty_days.iter().map(|d| d.to_string()).collect();
            summary.push_str(&format!("\nDays without data: {}", dates.join(", ")));
        }
        summary
    }
}

/// Drives the per-day loop: one file and one report block per day, in order.
pub struct RunProcessor {
    partitioner: DayPartitioner,
    analyzer: DailyAnalyzer,
}

impl RunProcessor {
    pub fn new() -> Self {
        Self {
            partitioner: DayPartitioner::new(),
            analyzer: DailyAnalyzer::new(),
        }
    }

    /// Per-day statistics without writing anything
    pub fn daily_statistics(&self, context: &RunContext) -> Vec<DailyStatistics> {
        self.partitioner
            .partition(&context.window, &context.series)
            .iter()
            .map(|view| self.analyzer.analyze(view))
            .collect()
    }

    pub fn run(&self, context: &RunContext, progress: Option<&ProgressReporter>) -> Result<RunSummary> {
        let settings = &context.settings;
        let daily_dir = settings.daily_dir();
        let writer = DailyFileWriter::new(settings.station_prefix.as_str());
        let mut report = ReportAccumulator::new(settings.data_filename.as_str());

        let days = self.partitioner.partition(&context.window, &context.series);
        info!(
            "Processing {} days from {} to {}",
            days.len(),
            context.window.start(),
            context.window.end()
        );

        let mut daily_files = Vec::with_capacity(days.len());
        let mut empty_days = Vec::new();
        let mut rows_written = 0;

        for view in &days {
            if let Some(p) = progress {
                p.set_message(&format!("Processing {}", view.date()));
            }

            let path = writer.write_day_file(view, &daily_dir)?;
            rows_written += view.rows.len();

            let stats = self.analyzer.analyze(view);
            if view.raw_backed_rows() == 0 {
                warn!("{}; writing sentinel rows", ProcessingError::NoDataForDay(view.date()));
                empty_days.push(view.date());
            }

            report.append(&writer.filename_for(view), &stats);
            daily_files.push(path);

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        let report_path = report_path(
            &settings.report_dir(),
            &settings.report_prefix,
            &context.window,
        );
        report.write_to(&report_path)?;

        Ok(RunSummary {
            days: days.len(),
            rows_written,
            daily_files,
            report_path,
            empty_days,
            qa_flagged: context.qa_summary.total_flagged(),
        })
    }
}

impl Default for RunProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ObservationRow, Reading};
    use chrono::{Duration, NaiveDateTime};
    use tempfile::TempDir;

    fn settings(dir: &TempDir, wind_chill: bool) -> Settings {
        let yaml = format!(
            r#"
data_file: unused.dat
data_filename: unused.dat
output_file_path: "{0}/reports"
output_csv_path: "{0}/csv"
start_date: "2021-02-01 00:00"
end_date: "2021-02-02 23:55"
wind_chill: {1}
variable:
  TAIR:
    QA:
      low_limit: -30
      high_limit: 40
"#,
            dir.path().display(),
            wind_chill
        );
        Settings::from_yaml_str(&yaml).unwrap()
    }

    fn raw_day_one() -> RawTable {
        let start = NaiveDateTime::parse_from_str("2021-02-01 00:00", "%Y-%m-%d %H:%M").unwrap();
        let rows = (0..288)
            .map(|i| {
                let mut row = ObservationRow::absent(start + Duration::minutes(5 * i));
                let temp = if i == 10 { 99.0 } else { 5.0 };
                row.set(Variable::AirTemperature, Reading::Present(temp));
                row.set(Variable::WindSpeed, Reading::Present(2.0));
                row.raw_backed = true;
                row
            })
            .collect();
        RawTable {
            station_name: Some("NWC0".to_string()),
            rows,
        }
    }

    #[test]
    fn test_prepare_flags_and_derives() {
        let dir = TempDir::new().unwrap();
        let context = RunContext::prepare(settings(&dir, true), raw_day_one()).unwrap();

        assert_eq!(context.series.len(), 576);
        assert_eq!(context.qa_summary.flagged_for(Variable::AirTemperature), 1);
        assert!(context.series.has_column(Variable::WindChill));
        assert_eq!(
            context.series.rows()[10].get(Variable::WindChill),
            Reading::Absent
        );
    }

    #[test]
    fn test_run_writes_files_and_report() {
        let dir = TempDir::new().unwrap();
        let context = RunContext::prepare(settings(&dir, false), raw_day_one()).unwrap();

        let summary = RunProcessor::new().run(&context, None).unwrap();

        assert_eq!(summary.days, 2);
        assert_eq!(summary.rows_written, 576);
        assert_eq!(summary.daily_files.len(), 2);
        assert!(summary.daily_files.iter().all(|p| p.exists()));
        assert_eq!(
            summary.empty_days,
            vec![NaiveDate::from_ymd_opt(2021, 2, 2).unwrap()]
        );
        assert!(summary
            .report_path
            .ends_with("NWC0_REPORT_20210201_20210202.txt"));

        let report = std::fs::read_to_string(&summary.report_path).unwrap();
        assert!(report.contains("Missing Observations: 0"));
        assert!(report.contains("Missing Observations: 288"));
        assert!(!report.contains("Wind Chill"));
    }

    #[test]
    fn test_daily_statistics_without_output() {
        let dir = TempDir::new().unwrap();
        let context = RunContext::prepare(settings(&dir, true), raw_day_one()).unwrap();

        let stats = RunProcessor::new().daily_statistics(&context);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].air_temperature.max, Some(5.0));
        assert!(stats[0].wind_chill.unwrap().is_defined());
        assert!(stats[1].has_no_data());
        assert!(!dir.path().join("csv").exists());
    }
}

use crate::error::Result;
use crate::models::{format_statistic, DailyStatistics, SummaryStats, Variable};
use crate::utils::constants::REPORT_TITLE;
use std::fs;
use std::path::Path;
use tracing::info;

/// Builds the run's statistics report one day block at a time.
///
/// Blocks are only ever appended; the header is fixed at construction and the
/// whole report is written once, at the end of the run.
#[derive(Debug, Clone)]
pub struct ReportAccumulator {
    input_label: String,
    body: String,
    blocks: usize,
}

impl ReportAccumulator {
    pub fn new(input_label: impl Into<String>) -> Self {
        Self {
            input_label: input_label.into(),
            body: String::new(),
            blocks: 0,
        }
    }

    pub fn append(&mut self, file_name: &str, stats: &DailyStatistics) {
        let body = &mut self.body;

        body.push_str(&format!("\n \t File: {}\n", file_name));
        body.push_str(&format!(
            "\t \t Missing Observations: {}\n",
            stats.missing_observations
        ));
        push_summary_line(body, Variable::AirTemperature, &stats.air_temperature);
        push_summary_line(body, Variable::WindSpeed, &stats.wind_speed);
        if let Some(wind_chill) = &stats.wind_chill {
            push_summary_line(body, Variable::WindChill, wind_chill);
        }
        body.push_str(&format!(
            "\t \t {:<19}:   {}\n",
            report_label(Variable::Rainfall),
            format_statistic(stats.total_rainfall)
        ));

        self.blocks += 1;
    }

    pub fn block_count(&self) -> usize {
        self.blocks
    }

    pub fn render(&self) -> String {
        format!(
            "{}\nInput file: {}\n{}",
            REPORT_TITLE, self.input_label, self.body
        )
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render())?;

        info!("Wrote report with {} day blocks to {}", self.blocks, path.display());
        Ok(())
    }
}

/// "Air Temperature (C)", "Wind Speed (m/s)", ...
fn report_label(variable: Variable) -> String {
    format!("{} ({})", variable.display_name(), variable.units())
}

fn push_summary_line(body: &mut String, variable: Variable, stats: &SummaryStats) {
    body.push_str(&format!(
        "\t \t {:<19}:    Max: {}    Min: {}    Avg: {}\n",
        report_label(variable),
        format_statistic(stats.max),
        format_statistic(stats.min),
        format_statistic(stats.mean)
    ));
}

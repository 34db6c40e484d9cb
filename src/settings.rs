//! Run settings.
//!
//! Settings come from a key-value file (YAML in practice) loaded through the
//! `config` crate, overlaid with `MESONET__*` environment variables, then
//! validated before anything touches the raw data.

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::{Validate, ValidationError};

use crate::error::{ProcessingError, Result};
use crate::models::{QaRule, QaRules, RunWindow, Variable};
use crate::utils::constants::{
    DEFAULT_REPORT_PREFIX, DEFAULT_STATION_PREFIX, SETTINGS_ENV_PREFIX,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Settings {
    /// Raw logger file
    #[validate(length(min = 1))]
    pub data_file: String,

    /// Label for the input file in the report header
    #[validate(length(min = 1))]
    pub data_filename: String,

    /// Directory for the statistics report
    #[validate(length(min = 1))]
    pub output_file_path: String,

    /// Directory for the daily files
    #[validate(length(min = 1))]
    pub output_csv_path: String,

    #[validate(length(min = 1))]
    pub start_date: String,

    #[validate(length(min = 1))]
    pub end_date: String,

    #[serde(default = "default_station_prefix")]
    #[validate(length(min = 1))]
    pub station_prefix: String,

    #[serde(default = "default_report_prefix")]
    #[validate(length(min = 1))]
    pub report_prefix: String,

    #[serde(default = "default_wind_chill")]
    pub wind_chill: bool,

    /// Per-variable settings keyed by logger column code (TAIR, WSPD, ...)
    #[serde(default)]
    pub variable: BTreeMap<String, VariableSettings>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariableSettings {
    #[serde(rename = "QA", alias = "qa", default)]
    pub qa: Option<QaLimits>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_limit_order"))]
pub struct QaLimits {
    pub low_limit: Option<f64>,
    pub high_limit: Option<f64>,
}

fn validate_limit_order(limits: &QaLimits) -> std::result::Result<(), ValidationError> {
    match (limits.low_limit, limits.high_limit) {
        (Some(low), Some(high)) if low > high => Err(ValidationError::new("low_limit_above_high_limit")),
        _ => Ok(()),
    }
}

fn default_station_prefix() -> String {
    DEFAULT_STATION_PREFIX.to_string()
}

fn default_report_prefix() -> String {
    DEFAULT_REPORT_PREFIX.to_string()
}

fn default_wind_chill() -> bool {
    true
}

impl Settings {
    /// Load and check settings from a file; the format follows the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = Self::load_unchecked(path)?;
        settings.check()?;
        Ok(settings)
    }

    /// Load settings without checking them, so window overrides can be
    /// applied before `check`.
    pub fn load_unchecked(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ProcessingError::Config(format!(
                "Settings file not found: {}",
                path.display()
            )));
        }

        let source = Config::builder()
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix(SETTINGS_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Self::from_config(source)
    }

    /// Load and check settings from an in-memory YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let source = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?;

        let settings = Self::from_config(source)?;
        settings.check()?;
        Ok(settings)
    }

    fn from_config(source: Config) -> Result<Self> {
        let settings: Settings = source.try_deserialize()?;

        debug!("Loaded settings: {}", serde_json::to_string(&settings)?);
        Ok(settings)
    }

    /// Field validation plus the checks that need parsing: window order and QA pairs.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        for limits in self.variable.values().filter_map(|v| v.qa.as_ref()) {
            limits.validate()?;
        }
        self.run_window()?;
        self.qa_rules()?;
        Ok(())
    }

    pub fn with_window(mut self, start: Option<String>, end: Option<String>) -> Self {
        if let Some(start) = start {
            self.start_date = start;
        }
        if let Some(end) = end {
            self.end_date = end;
        }
        self
    }

    pub fn run_window(&self) -> Result<RunWindow> {
        RunWindow::parse(&self.start_date, &self.end_date).map_err(|e| match e {
            ProcessingError::DateParse(err) => ProcessingError::Config(format!(
                "start_date/end_date must use YYYY-MM-DD HH:MM ('{}', '{}'): {}",
                self.start_date, self.end_date, err
            )),
            other => other,
        })
    }

    /// Build QA rules; a variable without a QA block is not checked.
    pub fn qa_rules(&self) -> Result<QaRules> {
        let mut rules = QaRules::new();

        for (code, variable_settings) in &self.variable {
            let variable = Variable::from_code(&code.to_ascii_uppercase()).ok_or_else(|| {
                ProcessingError::Config(format!("Unknown variable '{}' in settings", code))
            })?;

            let Some(limits) = &variable_settings.qa else {
                continue;
            };

            match (limits.low_limit, limits.high_limit) {
                (Some(low), Some(high)) => rules.insert(variable, QaRule::new(low, high)?),
                (None, None) => continue,
                _ => {
                    return Err(ProcessingError::Config(format!(
                        "QA for {} needs both low_limit and high_limit",
                        variable
                    )))
                }
            }
        }

        Ok(rules)
    }

    pub fn data_file(&self) -> PathBuf {
        PathBuf::from(&self.data_file)
    }

    pub fn report_dir(&self) -> PathBuf {
        PathBuf::from(&self.output_file_path)
    }

    pub fn daily_dir(&self) -> PathBuf {
        PathBuf::from(&self.output_csv_path)
    }
}

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings source error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid run window: start {start} is after end {end}")]
    InvalidWindow {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Input parse error on line {line}: {message}")]
    InputParse { line: usize, message: String },

    #[error("Required column '{0}' not found in input file")]
    MissingColumn(String),

    #[error("No raw observations for {0}")]
    NoDataForDay(NaiveDate),
}

impl ProcessingError {
    pub fn input_parse(line: usize, message: impl Into<String>) -> Self {
        ProcessingError::InputParse {
            line,
            message: message.into(),
        }
    }
}

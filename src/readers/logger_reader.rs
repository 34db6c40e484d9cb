use crate::error::{ProcessingError, Result};
use crate::models::{ObservationRow, Reading, Variable};
use crate::utils::constants::{
    RAW_COLUMN_NAMES_LINE, RAW_HEADER_LINES, RAW_TIMESTAMP_FORMAT, RECORD_COLUMN,
    SETTINGS_TIMESTAMP_FORMAT, TIMESTAMP_COLUMN,
};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Parsed logger file: one row per data line, in file order.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub station_name: Option<String>,
    pub rows: Vec<ObservationRow>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Column positions resolved from the names line
struct ColumnLayout {
    timestamp: usize,
    record: Option<usize>,
    variables: Vec<(Variable, usize)>,
}

impl ColumnLayout {
    fn from_names(names: &csv::StringRecord, line: usize) -> Result<Self> {
        let positions: HashMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name, i))
            .collect();

        let timestamp = *positions
            .get(TIMESTAMP_COLUMN)
            .ok_or_else(|| ProcessingError::MissingColumn(TIMESTAMP_COLUMN.to_string()))?;

        let mut variables = Vec::with_capacity(Variable::MEASURED.len());
        for variable in Variable::MEASURED {
            let index = positions
                .get(variable.code())
                .ok_or_else(|| ProcessingError::MissingColumn(variable.code().to_string()))?;
            variables.push((variable, *index));
        }

        debug!("Resolved {} columns from line {}", names.len(), line);

        Ok(Self {
            timestamp,
            record: positions.get(RECORD_COLUMN).copied(),
            variables,
        })
    }
}

/// Reader for TOA5-style datalogger exports.
pub struct LoggerReader {
    header_lines: usize,
}

impl LoggerReader {
    pub fn new() -> Self {
        Self {
            header_lines: RAW_HEADER_LINES,
        }
    }

    pub fn read_file(&self, path: &Path) -> Result<RawTable> {
        let file = File::open(path).map_err(|e| {
            ProcessingError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", path.display(), e),
            ))
        })?;
        let table = self.read_from(file)?;

        info!(
            "Read {} raw records from {} (station {})",
            table.len(),
            path.display(),
            table.station_name.as_deref().unwrap_or("unknown")
        );

        Ok(table)
    }

    pub fn read_from<R: Read>(&self, reader: R) -> Result<RawTable> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut table = RawTable::default();
        let mut layout: Option<ColumnLayout> = None;

        for (index, result) in csv_reader.records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(index + 1);
            let row_number = index + 1;

            if row_number == 1 {
                table.station_name = record.get(1).filter(|s| !s.is_empty()).map(str::to_string);
                continue;
            }
            if row_number == RAW_COLUMN_NAMES_LINE {
                layout = Some(ColumnLayout::from_names(&record, line)?);
                continue;
            }
            if row_number <= self.header_lines {
                continue;
            }

            let layout = layout
                .as_ref()
                .ok_or_else(|| ProcessingError::input_parse(line, "missing column names line"))?;

            // Blank trailing lines
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }

            table.rows.push(self.parse_data_record(&record, layout, line)?);
        }

        if layout.is_none() {
            return Err(ProcessingError::input_parse(
                RAW_COLUMN_NAMES_LINE,
                "file ends before the column names line",
            ));
        }

        Ok(table)
    }

    fn parse_data_record(
        &self,
        record: &csv::StringRecord,
        layout: &ColumnLayout,
        line: usize,
    ) -> Result<ObservationRow> {
        let raw_timestamp = record
            .get(layout.timestamp)
            .ok_or_else(|| ProcessingError::input_parse(line, "missing TIMESTAMP field"))?;
        let timestamp = parse_timestamp(raw_timestamp).ok_or_else(|| {
            ProcessingError::input_parse(line, format!("unparseable timestamp '{}'", raw_timestamp))
        })?;

        // RECORD is a logger counter; checked for shape only, never kept
        if let Some(field) = layout.record.and_then(|i| record.get(i)) {
            if !field.is_empty() && field.parse::<u64>().is_err() {
                return Err(ProcessingError::input_parse(
                    line,
                    format!("invalid RECORD counter '{}'", field),
                ));
            }
        }

        let mut row = ObservationRow::absent(timestamp);
        for (variable, index) in &layout.variables {
            let reading = parse_cell(record.get(*index).unwrap_or("")).ok_or_else(|| {
                ProcessingError::input_parse(
                    line,
                    format!(
                        "invalid {} value '{}'",
                        variable,
                        record.get(*index).unwrap_or("")
                    ),
                )
            })?;
            row.set(*variable, reading);
        }
        row.raw_backed = row.has_measurement();

        Ok(row)
    }
}

impl Default for LoggerReader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, RAW_TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, SETTINGS_TIMESTAMP_FORMAT))
        .ok()
}

/// `None` means the cell is not a number and not a missing marker.
fn parse_cell(value: &str) -> Option<Reading> {
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Some(Reading::Absent);
    }
    value.parse::<f64>().ok().map(Reading::from_value)
}

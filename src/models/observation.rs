use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::constants::MISSING_SENTINEL;

/// Logger variables, in output column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variable {
    AirTemperature,
    RelativeHumidity,
    SolarRadiation,
    WindSpeed,
    WindGust,
    WindDirection,
    Rainfall,
    BatteryVoltage,
    WindChill,
}

impl Variable {
    pub const COUNT: usize = 9;

    pub const ALL: [Variable; Variable::COUNT] = [
        Variable::AirTemperature,
        Variable::RelativeHumidity,
        Variable::SolarRadiation,
        Variable::WindSpeed,
        Variable::WindGust,
        Variable::WindDirection,
        Variable::Rainfall,
        Variable::BatteryVoltage,
        Variable::WindChill,
    ];

    /// Variables read from the logger file
    pub const MEASURED: [Variable; 8] = [
        Variable::AirTemperature,
        Variable::RelativeHumidity,
        Variable::SolarRadiation,
        Variable::WindSpeed,
        Variable::WindGust,
        Variable::WindDirection,
        Variable::Rainfall,
        Variable::BatteryVoltage,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "TAIR" => Some(Variable::AirTemperature),
            "RELH" => Some(Variable::RelativeHumidity),
            "SRAD" => Some(Variable::SolarRadiation),
            "WSPD" => Some(Variable::WindSpeed),
            "WMAX" => Some(Variable::WindGust),
            "WDIR" => Some(Variable::WindDirection),
            "RAIN" => Some(Variable::Rainfall),
            "BATV" => Some(Variable::BatteryVoltage),
            "CHIL" => Some(Variable::WindChill),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Variable::AirTemperature => "TAIR",
            Variable::RelativeHumidity => "RELH",
            Variable::SolarRadiation => "SRAD",
            Variable::WindSpeed => "WSPD",
            Variable::WindGust => "WMAX",
            Variable::WindDirection => "WDIR",
            Variable::Rainfall => "RAIN",
            Variable::BatteryVoltage => "BATV",
            Variable::WindChill => "CHIL",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Variable::AirTemperature => "Air Temperature",
            Variable::RelativeHumidity => "Relative Humidity",
            Variable::SolarRadiation => "Solar Radiation",
            Variable::WindSpeed => "Wind Speed",
            Variable::WindGust => "Wind Gust",
            Variable::WindDirection => "Wind Direction",
            Variable::Rainfall => "Precipitation",
            Variable::BatteryVoltage => "Battery Voltage",
            Variable::WindChill => "Wind Chill",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            Variable::AirTemperature | Variable::WindChill => "C",
            Variable::RelativeHumidity => "%",
            Variable::SolarRadiation => "W/m2",
            Variable::WindSpeed | Variable::WindGust => "m/s",
            Variable::WindDirection => "deg",
            Variable::Rainfall => "mm",
            Variable::BatteryVoltage => "V",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// State of one cell. Absence and QA failure stay distinct until output.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Reading {
    Present(f64),
    #[default]
    Absent,
    QaFailed,
}

impl Reading {
    /// Non-finite numbers are treated as absent.
    pub fn from_value(value: f64) -> Self {
        if value.is_finite() {
            Reading::Present(value)
        } else {
            Reading::Absent
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Reading::Present(v) => Some(*v),
            Reading::Absent | Reading::QaFailed => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Reading::Present(_))
    }

    /// Day-file rendering: real values keep one fractional digit at least.
    pub fn to_file_cell(&self) -> String {
        match self {
            Reading::Present(v) => {
                let cell = v.to_string();
                if cell.contains('.') {
                    cell
                } else {
                    format!("{}.0", cell)
                }
            }
            Reading::Absent | Reading::QaFailed => MISSING_SENTINEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRow {
    pub timestamp: NaiveDateTime,
    values: [Reading; Variable::COUNT],
    /// A raw record with at least one real measurement existed at this timestamp.
    pub raw_backed: bool,
}

impl ObservationRow {
    /// A grid row with no raw record behind it.
    pub fn absent(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            values: [Reading::Absent; Variable::COUNT],
            raw_backed: false,
        }
    }

    pub fn get(&self, variable: Variable) -> Reading {
        self.values[variable.index()]
    }

    pub fn set(&mut self, variable: Variable, reading: Reading) {
        self.values[variable.index()] = reading;
    }

    pub fn has_measurement(&self) -> bool {
        Variable::MEASURED.iter().any(|v| self.get(*v).is_present())
    }
}

/// The reconciled series for one run: one row per grid timestamp, ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSeries {
    rows: Vec<ObservationRow>,
    columns: Vec<Variable>,
}

impl ObservationSeries {
    pub fn new(rows: Vec<ObservationRow>) -> Self {
        Self {
            rows,
            columns: Variable::MEASURED.to_vec(),
        }
    }

    pub fn rows(&self) -> &[ObservationRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [ObservationRow] {
        &mut self.rows
    }

    /// Output columns, excluding the timestamp
    pub fn columns(&self) -> &[Variable] {
        &self.columns
    }

    pub fn has_column(&self, variable: Variable) -> bool {
        self.columns.contains(&variable)
    }

    /// Register a derived column; values default to absent until computed.
    pub fn add_column(&mut self, variable: Variable) {
        if !self.has_column(variable) {
            self.columns.push(variable);
            self.columns.sort();
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

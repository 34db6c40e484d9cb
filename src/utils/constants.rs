/// Logger sampling interval in minutes
pub const SAMPLE_INTERVAL_MINUTES: i64 = 5;

/// Expected observations per day at the sampling interval (24h x 12/hour)
pub const EXPECTED_DAILY_OBSERVATIONS: usize = 288;

/// Last scheduled sample of a day window
pub const DAY_END_HOUR: u32 = 23;
pub const DAY_END_MINUTE: u32 = 55;

/// Output sentinel for absent and QA-failed cells
pub const MISSING_SENTINEL: &str = "-9999";

/// Placeholder for an undefined statistic in the report
pub const UNDEFINED_STATISTIC: &str = "NaN";

/// Raw input layout (TOA5): line 1 environment, line 2 names, lines 3-4 units/processing
pub const RAW_HEADER_LINES: usize = 4;
pub const RAW_COLUMN_NAMES_LINE: usize = 2;

/// Column names
pub const TIMESTAMP_COLUMN: &str = "TIMESTAMP";
pub const RECORD_COLUMN: &str = "RECORD";

/// Timestamp formats
pub const SETTINGS_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const RAW_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const FILE_DATE_FORMAT: &str = "%Y%m%d";

/// Output naming defaults
pub const DEFAULT_STATION_PREFIX: &str = "NWC";
pub const DEFAULT_REPORT_PREFIX: &str = "NWC0";
pub const DAY_FILE_EXTENSION: &str = "dat";
pub const REPORT_FILE_EXTENSION: &str = "txt";

/// Report header
pub const REPORT_TITLE: &str = "Statistics Report (QA)";

/// Environment variable prefix for settings overrides
pub const SETTINGS_ENV_PREFIX: &str = "MESONET";

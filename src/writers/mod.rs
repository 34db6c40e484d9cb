pub mod daily_writer;
pub mod report_writer;

pub use daily_writer::DailyFileWriter;
pub use report_writer::ReportAccumulator;

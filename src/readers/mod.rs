pub mod logger_reader;

pub use logger_reader::{LoggerReader, RawTable};

pub mod daily_analyzer;

pub use daily_analyzer::DailyAnalyzer;

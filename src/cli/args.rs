use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mesonet-processor")]
#[command(about = "Daily files and QA statistics report from 5-minute mesonet logger data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase logging verbosity (-v, -vv)")]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Only log warnings and hide progress")]
    pub quiet: bool,
}

impl Cli {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write daily files and the statistics report for a run window
    Process {
        #[arg(short, long, help = "Settings file (YAML)")]
        settings: PathBuf,

        #[arg(long, help = "Override start_date (YYYY-MM-DD HH:MM)")]
        start_date: Option<String>,

        #[arg(long, help = "Override end_date (YYYY-MM-DD HH:MM)")]
        end_date: Option<String>,

        #[arg(long, default_value = "false")]
        validate_only: bool,
    },

    /// Check settings and raw input without writing anything
    Validate {
        #[arg(short, long, help = "Settings file (YAML)")]
        settings: PathBuf,

        #[arg(long, help = "Override start_date (YYYY-MM-DD HH:MM)")]
        start_date: Option<String>,

        #[arg(long, help = "Override end_date (YYYY-MM-DD HH:MM)")]
        end_date: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_process() {
        let cli = Cli::parse_from([
            "mesonet-processor",
            "process",
            "--settings",
            "settings.yaml",
            "--end-date",
            "2021-02-01 23:55",
            "-v",
        ]);

        assert_eq!(cli.get_log_level(), "debug");
        match cli.command {
            Commands::Process {
                settings,
                start_date,
                end_date,
                validate_only,
            } => {
                assert_eq!(settings, PathBuf::from("settings.yaml"));
                assert_eq!(start_date, None);
                assert_eq!(end_date.as_deref(), Some("2021-02-01 23:55"));
                assert!(!validate_only);
            }
            _ => panic!("expected process command"),
        }
    }

    #[test]
    fn test_quiet_hides_progress() {
        let cli = Cli::parse_from(["mesonet-processor", "-q", "validate", "-s", "s.yaml"]);
        assert!(!cli.show_progress());
        assert_eq!(cli.get_log_level(), "warn");
    }
}

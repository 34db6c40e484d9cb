use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::processors::{RunContext, RunProcessor};
use crate::settings::Settings;
use crate::utils::progress::ProgressReporter;
use std::path::Path;
use tracing::debug;

pub fn run(cli: Cli) -> Result<()> {
    setup_logging(&cli);
    let show_progress = cli.show_progress();

    match cli.command {
        Commands::Process {
            settings,
            start_date,
            end_date,
            validate_only,
        } => {
            let settings = load_settings(&settings, start_date, end_date)?;
            println!("Processing logger data...");
            println!("Input file: {}", settings.data_file);
            println!("Window: {} to {}", settings.start_date, settings.end_date);

            let context = RunContext::load(settings)?;
            println!("\n{}", context.qa_summary.generate_summary());

            if validate_only {
                println!("Validation complete - no output files written");
                return Ok(());
            }

            let days = context.window.days().len() as u64;
            let progress = ProgressReporter::new(days, "Writing daily files...", !show_progress);

            let summary = RunProcessor::new().run(&context, Some(&progress))?;
            progress.finish_with_message(&format!("Wrote {} daily files", summary.days));

            println!("\n{}", summary.summary());
            println!("Processing complete!");
        }

        Commands::Validate {
            settings,
            start_date,
            end_date,
        } => {
            let settings = load_settings(&settings, start_date, end_date)?;
            let progress = ProgressReporter::new_spinner("Validating input...", !show_progress);

            let context = RunContext::load(settings)?;
            progress.finish_with_message("Validation complete");

            let merge = &context.merge_stats;
            progress.println(&format!(
                "Station: {}\nRaw records: {}\nGrid slots: {} ({} matched, {} gaps)\nDuplicates: {}, off-grid: {}, outside window: {}",
                context.station_name.as_deref().unwrap_or("unknown"),
                merge.raw_records,
                merge.grid_len,
                merge.matched,
                merge.gaps(),
                merge.duplicates,
                merge.off_grid,
                merge.outside_window
            ));
            println!("\n{}", context.qa_summary.generate_summary());

            let empty_days: Vec<_> = RunProcessor::new()
                .daily_statistics(&context)
                .into_iter()
                .filter(|stats| stats.has_no_data())
                .map(|stats| stats.date.to_string())
                .collect();

            if empty_days.is_empty() {
                println!("✅ Every day in the window has data");
            } else {
                println!("⚠️  Days without data: {}", empty_days.join(", "));
            }
        }
    }

    Ok(())
}

fn load_settings(path: &Path, start_date: Option<String>, end_date: Option<String>) -> Result<Settings> {
    let settings = Settings::load_unchecked(path)?.with_window(start_date, end_date);
    settings.check()?;
    debug!("Run window {} to {}", settings.start_date, settings.end_date);
    Ok(settings)
}

/// Set up structured logging based on CLI arguments
fn setup_logging(cli: &Cli) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mesonet_processor={}", cli.get_log_level())));

    // A subscriber may already be installed (tests, embedding)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();
}

use clap::Parser;
use mesonet_processor::cli::{run, Cli};
use mesonet_processor::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

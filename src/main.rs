use anyhow::Context;
use clap::Parser;
use std::process;
use zone_energy::TracingDiagnostics;
use zone_energy::cli::{Args, print_report, setup_logging};
use zone_energy::processor::EnergyProcessor;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    if let Err(error) = run(args) {
        // Error occurred - print to stderr and exit with error code
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    setup_logging(&args);

    let processor = EnergyProcessor::new(args.to_config());
    let output = processor
        .process(&args.input, &mut TracingDiagnostics)
        .with_context(|| format!("Failed to process {}", args.input.display()))?;

    print_report(&output, &args).context("Failed to write report")?;
    Ok(())
}

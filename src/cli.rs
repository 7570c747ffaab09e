//! Command-line interface components.

use crate::config::PipelineConfig;
use crate::constants::{
    DEFAULT_FILL_MODE, LOG_TARGET, MEASUREMENT_UNIT_STATUS, TOTAL_COLUMN_NAME, ZONE_COLUMN_NAMES,
};
use crate::error::Result;
use crate::models::{Measurement, Period, ProcessingStats};
use crate::processor::PipelineOutput;
use crate::processor::writer::dataset_to_frame;

use clap::{Parser, ValueEnum};
use colored::*;
use polars::prelude::{CsvWriter, SerWriter};
use std::path::PathBuf;
use tracing::debug;

/// Report format written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned, human readable table
    Table,
    /// CSV with a header row
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "zone-energy")]
#[command(about = "Repair and aggregate multi-zone energy readings")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Measurement file (CSV, no header: 6 time fields then 4 zone readings)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Fill mode for corrupted readings (forward_fill, backward_fill, drop)
    #[arg(short, long, default_value = DEFAULT_FILL_MODE)]
    pub fill_mode: String,

    /// Aggregation period (none, minute, hour, day, month, hour_of_day)
    #[arg(short, long, default_value = "minute")]
    pub period: Period,

    /// Add a column with the total across all zones
    #[arg(long)]
    pub combined: bool,

    /// Also export the aggregated report to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format for stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Build the pipeline configuration from the command line
    pub fn to_config(&self) -> PipelineConfig {
        let config = PipelineConfig::default()
            .with_fill_mode(self.fill_mode.clone())
            .with_period(self.period)
            .with_combined(self.combined);

        match &self.output {
            Some(path) => config.with_output_path(path),
            None => config,
        }
    }

    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Filter directive scoping the chosen level to this crate
    pub fn log_directive(&self) -> String {
        format!("{}={}", LOG_TARGET, self.log_level())
    }
}

/// Install the stderr subscriber; `RUST_LOG` takes precedence over the flags
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt::time::uptime};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(uptime())
        .compact()
        .init();

    debug!("Logging initialized at level: {}", args.log_level());
}

/// Column header line for table output
pub fn table_header(combined: bool) -> String {
    let mut header = format!("{:<19}", "time");
    for name in ZONE_COLUMN_NAMES {
        header.push_str(&format!(" {:>12}", name));
    }
    if combined {
        header.push_str(&format!(" {:>12}", TOTAL_COLUMN_NAME));
    }
    header
}

/// One table line for a measurement
pub fn table_row(measurement: &Measurement, combined: bool) -> String {
    let mut row = format!("{:<19}", measurement.time.label());
    for reading in measurement.zones.readings() {
        row.push_str(&format!(" {:>12.3}", reading));
    }
    if combined {
        row.push_str(&format!(" {:>12.3}", measurement.zones.total()));
    }
    row
}

/// Print the report for a finished run to stdout
pub fn print_report(output: &PipelineOutput, args: &Args) -> Result<()> {
    match args.format {
        OutputFormat::Csv => {
            let mut df = dataset_to_frame(&output.dataset, args.combined)?;
            CsvWriter::new(std::io::stdout())
                .include_header(true)
                .finish(&mut df)?;
        }
        OutputFormat::Table => {
            println!("{}", output.stats.period.status().bright_green().bold());
            println!("{}", MEASUREMENT_UNIT_STATUS.bright_black());
            println!();

            if output.dataset.is_empty() {
                println!("{}", "No data available".bright_yellow());
            } else {
                println!("{}", table_header(args.combined).bright_cyan());
                for measurement in &output.dataset {
                    println!("{}", table_row(measurement, args.combined));
                }
            }

            print_summary(&output.stats);
        }
    }
    Ok(())
}

fn print_summary(stats: &ProcessingStats) {
    println!();
    println!("{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Rows read:".bright_cyan(),
        stats.rows_read.to_string().bright_white()
    );
    if stats.rows_corrupted > 0 {
        println!(
            "  {} {} ({} repaired, {} dropped, {})",
            "Corrupted rows:".bright_red(),
            stats.rows_corrupted.to_string().bright_red().bold(),
            stats.rows_repaired,
            stats.rows_dropped,
            stats.effective_fill_mode
        );
    }
    println!(
        "  {} {}",
        "Buckets:".bright_cyan(),
        stats.buckets.to_string().bright_white().bold()
    );
    if let Some(path) = &stats.output_path {
        println!("  {} {}", "Report:".bright_cyan(), path.display());
    }
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeVector;

    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from(["zone-energy", "readings.csv"]).unwrap();

        assert_eq!(args.input, PathBuf::from("readings.csv"));
        assert_eq!(args.fill_mode, "forward_fill");
        assert_eq!(args.period, Period::Minute);
        assert_eq!(args.format, OutputFormat::Table);
        assert_eq!(args.log_level(), "info");
        assert_eq!(args.to_config(), PipelineConfig::default());
    }

    #[test]
    fn test_parse_all_options() {
        let args = Args::try_parse_from([
            "zone-energy",
            "readings.csv",
            "--fill-mode",
            "backward fill",
            "--period",
            "hour_of_day",
            "--combined",
            "--output",
            "report.csv",
            "--format",
            "csv",
            "--verbose",
        ])
        .unwrap();

        let config = args.to_config();
        assert_eq!(config.fill_mode, "backward fill");
        assert_eq!(config.period, Period::HourOfDay);
        assert!(config.combined);
        assert_eq!(config.output_path, Some(PathBuf::from("report.csv")));
        assert_eq!(args.format, OutputFormat::Csv);
        assert_eq!(args.log_level(), "debug");
    }

    #[test]
    fn test_log_directive_follows_flags() {
        let quiet = Args::try_parse_from(["zone-energy", "readings.csv", "-q"]).unwrap();
        let verbose = Args::try_parse_from(["zone-energy", "readings.csv", "-v"]).unwrap();
        let default = Args::try_parse_from(["zone-energy", "readings.csv"]).unwrap();

        assert_eq!(quiet.log_directive(), "zone_energy=warn");
        assert_eq!(verbose.log_directive(), "zone_energy=debug");
        assert_eq!(default.log_directive(), "zone_energy=info");
    }

    #[test]
    fn test_unknown_period_is_rejected() {
        let result = Args::try_parse_from(["zone-energy", "readings.csv", "--period", "fortnight"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = Args::try_parse_from(["zone-energy", "readings.csv", "-v", "-q"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_table_formatting() {
        let measurement = Measurement::new([0, 0, 0, 5, 0, 0], [10.0, 0.0, 0.0, 0.5]);
        let row = table_row(&measurement, true);

        assert!(row.starts_with("05:00:00"));
        assert!(row.ends_with("10.500"));
        assert_eq!(table_header(true).len(), row.len());
        assert_eq!(
            table_row(&Measurement::new(TimeVector::new(2023, 1, 2, 3, 4, 5), [0.0; 4]), false)
                .len(),
            table_header(false).len()
        );
    }
}

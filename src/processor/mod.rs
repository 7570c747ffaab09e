//! Main processing pipeline.
//!
//! Orchestrates one run over a measurement file: read the raw rows, repair
//! corrupted readings, aggregate to the configured period and sort the
//! buckets chronologically. Optionally exports the result as a CSV report.

pub mod writer;

#[cfg(test)]
pub mod tests;

use self::writer::ReportWriter;

use crate::aggregation::aggregate;
use crate::config::PipelineConfig;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::{EnergyError, Result};
use crate::gap_fill::{self, RepairOutcome};
use crate::models::{Dataset, FillMode, Period, ProcessingStats};
use crate::reader::{file_exists, read_measurements};

use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Aggregated dataset plus what happened while producing it
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub dataset: Dataset,
    pub stats: ProcessingStats,
}

/// Main processor for measurement files
#[derive(Debug, Clone, Default)]
pub struct EnergyProcessor {
    config: PipelineConfig,
}

impl EnergyProcessor {
    /// Create a new processor
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read and repair a measurement file without aggregating it
    pub fn load(&self, input: &Path, diagnostics: &mut dyn Diagnostics) -> Result<RepairOutcome> {
        if !file_exists(input) {
            return Err(EnergyError::FileNotFound {
                path: input.to_path_buf(),
            });
        }

        let rows = read_measurements(input)?;
        let fill_mode = FillMode::resolve(&self.config.fill_mode, diagnostics);
        let outcome = gap_fill::repair(rows, fill_mode, diagnostics);

        debug!(
            "Repair with {}: {} rows read, {} corrupted, {} repaired, {} dropped",
            outcome.summary.effective_mode,
            outcome.summary.rows_read,
            outcome.summary.rows_corrupted,
            outcome.summary.rows_repaired,
            outcome.summary.rows_dropped
        );

        Ok(outcome)
    }

    /// Main processing entry point
    pub fn process(&self, input: &Path, diagnostics: &mut dyn Diagnostics) -> Result<PipelineOutput> {
        let start_time = Instant::now();
        self.config.validate()?;

        info!(
            "Processing {} (fill mode: {}, period: {})",
            input.display(),
            self.config.fill_mode,
            self.config.period
        );

        // Step 1: Read and repair
        let RepairOutcome { dataset: cleaned, summary } = self.load(input, diagnostics)?;

        // Step 2: Aggregate and order
        let mut dataset = aggregate(&cleaned, self.config.period);
        dataset.sort_chronologically();

        // Step 3: Optional export
        if let Some(output_path) = &self.config.output_path {
            let rows = ReportWriter::new(output_path).write_csv(&dataset, self.config.combined)?;
            info!("Exported {} buckets to {}", rows, output_path.display());
        }

        let stats = ProcessingStats {
            rows_read: summary.rows_read,
            rows_corrupted: summary.rows_corrupted,
            rows_repaired: summary.rows_repaired,
            rows_dropped: summary.rows_dropped,
            buckets: dataset.len(),
            effective_fill_mode: summary.effective_mode,
            period: self.config.period,
            output_path: self.config.output_path.clone(),
            processing_time_ms: start_time.elapsed().as_millis(),
        };

        info!(
            "Produced {} {} buckets from {} rows",
            stats.buckets, stats.period, stats.rows_read
        );

        Ok(PipelineOutput { dataset, stats })
    }
}

/// Read and repair a measurement file, reporting downgrades through `tracing`
pub fn load_and_repair(path: &Path, fill_mode: &str) -> Result<Dataset> {
    let config = PipelineConfig::default().with_fill_mode(fill_mode);
    let outcome = EnergyProcessor::new(config).load(path, &mut TracingDiagnostics)?;
    Ok(outcome.dataset)
}

/// Load, repair, aggregate and chronologically sort a measurement file
pub fn run(path: &Path, fill_mode: &str, period: Period) -> Result<Dataset> {
    let config = PipelineConfig::default()
        .with_fill_mode(fill_mode)
        .with_period(period);
    let output = EnergyProcessor::new(config).process(path, &mut TracingDiagnostics)?;
    Ok(output.dataset)
}

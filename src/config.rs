//! Configuration management and validation.
//!
//! Provides the pipeline configuration: which fill mode repairs corrupted
//! readings, which period the repaired series is aggregated to, and where
//! (if anywhere) the aggregated report is exported.

use crate::constants::DEFAULT_FILL_MODE;
use crate::error::{EnergyError, Result};
use crate::models::Period;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global configuration for one processing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Requested fill mode name. Unknown names fall back to drop with a
    /// warning rather than failing the run.
    pub fill_mode: String,

    /// Aggregation period
    pub period: Period,

    /// Add a total column summing all zones to exported reports
    pub combined: bool,

    /// Optional CSV export path for the aggregated report
    pub output_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fill_mode: DEFAULT_FILL_MODE.to_string(),
            period: Period::Minute,
            combined: false,
            output_path: None,
        }
    }
}

impl PipelineConfig {
    /// Set the requested fill mode name
    pub fn with_fill_mode(mut self, fill_mode: impl Into<String>) -> Self {
        self.fill_mode = fill_mode.into();
        self
    }

    /// Set the aggregation period
    pub fn with_period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    /// Include the combined total column in exports
    pub fn with_combined(mut self, combined: bool) -> Self {
        self.combined = combined;
        self
    }

    /// Export the aggregated report to a CSV file
    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(output_path.into());
        self
    }

    /// Reject configurations that cannot be honoured before any work starts
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.output_path {
            if path.is_dir() {
                return Err(EnergyError::configuration(format!(
                    "output path {} is a directory",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

//! CSV report writer for aggregated datasets
//!
//! Converts a dataset into a polars frame (time columns, zone columns and an
//! optional combined total) and writes it with a header row.

use crate::constants::{TIME_COLUMN_NAMES, TOTAL_COLUMN_NAME, ZONE_COLUMN_NAMES};
use crate::error::{EnergyError, Result};
use crate::models::Dataset;

use polars::prelude::{Column, CsvWriter, DataFrame, SerWriter};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Build a frame with one row per measurement
pub fn dataset_to_frame(dataset: &Dataset, combined: bool) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(TIME_COLUMN_NAMES.len() + ZONE_COLUMN_NAMES.len() + 1);

    for (index, name) in TIME_COLUMN_NAMES.iter().enumerate() {
        let values: Vec<i64> = dataset.iter().map(|m| m.time.0[index]).collect();
        columns.push(Column::new((*name).into(), values));
    }
    for (index, name) in ZONE_COLUMN_NAMES.iter().enumerate() {
        let values: Vec<f64> = dataset.iter().map(|m| m.zones.0[index]).collect();
        columns.push(Column::new((*name).into(), values));
    }
    if combined {
        let totals: Vec<f64> = dataset.iter().map(|m| m.zones.total()).collect();
        columns.push(Column::new(TOTAL_COLUMN_NAME.into(), totals));
    }

    Ok(DataFrame::new(columns)?)
}

/// Writes aggregated reports to CSV
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_path: PathBuf,
}

impl ReportWriter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Write the dataset, returning the number of rows written
    pub fn write_csv(&self, dataset: &Dataset, combined: bool) -> Result<usize> {
        let mut df = dataset_to_frame(dataset, combined)?;

        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = std::fs::File::create(&self.output_path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)
            .map_err(|e| {
                EnergyError::invalid_format(
                    &self.output_path,
                    format!("Failed to write report: {}", e),
                )
            })?;

        debug!(
            "Wrote {} rows to {}",
            df.height(),
            self.output_path.display()
        );
        Ok(df.height())
    }
}

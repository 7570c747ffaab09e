//! CSV reader for raw measurement files.
//!
//! Input files have no header row and exactly ten columns per row:
//! six integer time fields followed by four floating point zone readings.
//! The whole file is read into memory and parsed with polars against a
//! fixed schema before any processing begins. Blank lines are skipped.

use crate::constants::{
    HOURS_PER_DAY, TIME_COLUMN_NAMES, TIME_FIELDS, ZONE_COLUMN_NAMES, ZONE_FIELDS, time_index,
};
use crate::error::{EnergyError, Result};
use crate::models::{Measurement, TimeVector, ZoneVector};

use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Returns whether a path leads to an existing regular file
pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

/// Polars schema for the ten input columns
pub fn measurement_schema() -> Schema {
    let time_fields = TIME_COLUMN_NAMES
        .iter()
        .map(|name| Field::new((*name).into(), DataType::Int64));
    let zone_fields = ZONE_COLUMN_NAMES
        .iter()
        .map(|name| Field::new((*name).into(), DataType::Float64));

    Schema::from_iter(time_fields.chain(zone_fields))
}

/// Read all raw measurements from a CSV file, in file order
pub fn read_measurements(path: &Path) -> Result<Vec<Measurement>> {
    debug!("Reading measurements from {}", path.display());

    let bytes = std::fs::read(path)?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        debug!("Empty measurement file: {}", path.display());
        return Ok(Vec::new());
    }

    let df = CsvReadOptions::default()
        .with_has_header(false)
        .with_schema(Some(Arc::new(measurement_schema())))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;

    let measurements = frame_to_measurements(&df, path)?;
    debug!(
        "Read {} rows from {}",
        measurements.len(),
        path.display()
    );

    Ok(measurements)
}

/// Materialise a ten column frame into measurements
fn frame_to_measurements(df: &DataFrame, path: &Path) -> Result<Vec<Measurement>> {
    let time_columns = TIME_COLUMN_NAMES
        .iter()
        .map(|name| df.column(name)?.as_materialized_series().i64().cloned())
        .collect::<PolarsResult<Vec<Int64Chunked>>>()?;
    let zone_columns = ZONE_COLUMN_NAMES
        .iter()
        .map(|name| df.column(name)?.as_materialized_series().f64().cloned())
        .collect::<PolarsResult<Vec<Float64Chunked>>>()?;

    let missing = |row: usize, column: &str| {
        EnergyError::invalid_format(
            path,
            format!("row {} has no value for column '{}'", row + 1, column),
        )
    };

    let is_blank = |row: usize| {
        time_columns.iter().all(|column| column.get(row).is_none())
            && zone_columns.iter().all(|column| column.get(row).is_none())
    };

    let mut measurements = Vec::with_capacity(df.height());
    let mut blank_rows = 0;
    for row in 0..df.height() {
        if is_blank(row) {
            blank_rows += 1;
            continue;
        }

        let mut time = [0i64; TIME_FIELDS];
        for (field, (column, name)) in time.iter_mut().zip(time_columns.iter().zip(TIME_COLUMN_NAMES)) {
            *field = column.get(row).ok_or_else(|| missing(row, name))?;
        }

        // Hour of day buckets are only well formed for clock hours
        let hour = time[time_index::HOUR];
        if !(0..HOURS_PER_DAY).contains(&hour) {
            return Err(EnergyError::invalid_format(
                path,
                format!(
                    "row {} has hour {} outside 0..{}",
                    row + 1,
                    hour,
                    HOURS_PER_DAY
                ),
            ));
        }

        let mut zones = [0f64; ZONE_FIELDS];
        for (reading, (column, name)) in zones.iter_mut().zip(zone_columns.iter().zip(ZONE_COLUMN_NAMES)) {
            *reading = column.get(row).ok_or_else(|| missing(row, name))?;
        }

        measurements.push(Measurement {
            time: TimeVector(time),
            zones: ZoneVector(zones),
        });
    }

    if blank_rows > 0 {
        debug!("Skipped {} blank lines in {}", blank_rows, path.display());
    }

    Ok(measurements)
}

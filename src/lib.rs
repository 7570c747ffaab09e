//! Zone Energy Library
//!
//! A Rust library for repairing and aggregating time-stamped energy readings
//! from four metering zones.
//!
//! This library provides tools for:
//! - Reading headerless ten-column measurement files
//! - Repairing sensor dropouts by forward fill, backward fill or dropping rows
//! - Aggregating repaired readings into minute, hour, day, month and
//!   hour-of-day buckets
//! - Exporting aggregated reports as CSV

pub mod aggregation;
pub mod cli;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod gap_fill;
pub mod models;
pub mod processor;
pub mod reader;

// Re-export commonly used types
pub use aggregation::aggregate;
pub use config::PipelineConfig;
pub use diagnostics::{CollectedDiagnostics, Diagnostics, TracingDiagnostics};
pub use error::{EnergyError, Result};
pub use models::{Dataset, FillMode, Measurement, Period, TimeVector, ZoneVector};
pub use processor::{EnergyProcessor, PipelineOutput, load_and_repair, run};

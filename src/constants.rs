//! Application constants for the zone energy processor
//!
//! This module contains the fixed record layout, the corruption sentinel,
//! column names and report labels used throughout the application.

// =============================================================================
// Record Layout
// =============================================================================

/// Number of time fields at the start of every row
/// (`year, month, day, hour, minute, second`)
pub const TIME_FIELDS: usize = 6;

/// Number of metering zones following the time fields
pub const ZONE_FIELDS: usize = 4;

/// Total number of columns in an input row
pub const ROW_FIELDS: usize = TIME_FIELDS + ZONE_FIELDS;

/// Reserved reading marking a corrupted or missing zone measurement.
///
/// Compared exactly, never with a tolerance.
pub const CORRUPTION_SENTINEL: f64 = -1.0;

/// Time field positions within a time vector
pub mod time_index {
    pub const YEAR: usize = 0;
    pub const MONTH: usize = 1;
    pub const DAY: usize = 2;
    pub const HOUR: usize = 3;
    pub const MINUTE: usize = 4;
    pub const SECOND: usize = 5;
}

/// Number of buckets produced by the hour-of-day period
pub const HOURS_PER_DAY: i64 = 24;

// =============================================================================
// Column Names
// =============================================================================

/// Column names assigned to the time fields when reading and writing CSV
pub const TIME_COLUMN_NAMES: [&str; TIME_FIELDS] =
    ["year", "month", "day", "hour", "minute", "second"];

/// Column names assigned to the zone readings when reading and writing CSV
pub const ZONE_COLUMN_NAMES: [&str; ZONE_FIELDS] = ["zone1", "zone2", "zone3", "zone4"];

/// Column holding the sum across all zones in combined reports
pub const TOTAL_COLUMN_NAME: &str = "total";

// =============================================================================
// Report Labels
// =============================================================================

/// Unit label printed alongside every report
pub const MEASUREMENT_UNIT_STATUS: &str = "Measurements in watt-hour";

/// Default fill mode name when none is configured
pub const DEFAULT_FILL_MODE: &str = "forward_fill";

/// Log target prefix used by the CLI filter
pub const LOG_TARGET: &str = "zone_energy";

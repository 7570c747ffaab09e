//! Core data structures and types for zone energy processing.
//!
//! Defines the fixed-width record shape (time vector and zone vector),
//! the corruption classification, and the fill-mode and period selectors
//! used throughout the library.

use crate::constants::{
    CORRUPTION_SENTINEL, HOURS_PER_DAY, TIME_FIELDS, ZONE_FIELDS, time_index,
};
use crate::diagnostics::Diagnostics;
use crate::error::EnergyError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Timestamp of a measurement as `[year, month, day, hour, minute, second]`
///
/// Ordering is lexicographic over the fields, so year is the most
/// significant key and second the least.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeVector(pub [i64; TIME_FIELDS]);

impl TimeVector {
    pub fn new(year: i64, month: i64, day: i64, hour: i64, minute: i64, second: i64) -> Self {
        Self([year, month, day, hour, minute, second])
    }

    pub fn fields(&self) -> &[i64; TIME_FIELDS] {
        &self.0
    }

    pub fn hour(&self) -> i64 {
        self.0[time_index::HOUR]
    }

    /// Convert to a calendar timestamp, if the fields form a valid instant
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        let [year, month, day, hour, minute, second] = self.0;
        let date = NaiveDate::from_ymd_opt(
            i32::try_from(year).ok()?,
            u32::try_from(month).ok()?,
            u32::try_from(day).ok()?,
        )?;
        date.and_hms_opt(
            u32::try_from(hour).ok()?,
            u32::try_from(minute).ok()?,
            u32::try_from(second).ok()?,
        )
    }

    /// True when only the clock part is populated, as produced by the
    /// hour-of-day period
    pub fn is_clock_only(&self) -> bool {
        self.0[time_index::YEAR] == 0 && self.0[time_index::MONTH] == 0 && self.0[time_index::DAY] == 0
    }

    /// Human readable label for reports.
    ///
    /// Clock-only vectors render as `HH:MM:SS`; everything else renders as an
    /// ISO-like timestamp, falling back to the raw fields when they do not
    /// form a valid calendar date.
    pub fn label(&self) -> String {
        let [year, month, day, hour, minute, second] = self.0;
        if self.is_clock_only() {
            return format!("{:02}:{:02}:{:02}", hour, minute, second);
        }
        match self.to_datetime() {
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                year, month, day, hour, minute, second
            ),
        }
    }
}

impl From<[i64; TIME_FIELDS]> for TimeVector {
    fn from(fields: [i64; TIME_FIELDS]) -> Self {
        Self(fields)
    }
}

/// Readings for the four metering zones of one measurement
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoneVector(pub [f64; ZONE_FIELDS]);

impl ZoneVector {
    pub fn zero() -> Self {
        Self([0.0; ZONE_FIELDS])
    }

    pub fn readings(&self) -> &[f64; ZONE_FIELDS] {
        &self.0
    }

    /// Indexes of readings equal to the corruption sentinel, ascending
    pub fn corrupted_field_indexes(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, reading)| **reading == CORRUPTION_SENTINEL)
            .map(|(index, _)| index)
            .collect()
    }

    /// True if any reading equals the corruption sentinel
    pub fn is_corrupted(&self) -> bool {
        self.0.iter().any(|reading| *reading == CORRUPTION_SENTINEL)
    }

    /// Sum across all zones
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl From<[f64; ZONE_FIELDS]> for ZoneVector {
    fn from(readings: [f64; ZONE_FIELDS]) -> Self {
        Self(readings)
    }
}

/// A single timestamped set of zone readings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub time: TimeVector,
    pub zones: ZoneVector,
}

impl Measurement {
    pub fn new(time: impl Into<TimeVector>, zones: impl Into<ZoneVector>) -> Self {
        Self {
            time: time.into(),
            zones: zones.into(),
        }
    }

    pub fn is_corrupted(&self) -> bool {
        self.zones.is_corrupted()
    }
}

/// Ordered sequence of measurements sharing one processing stage
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    measurements: Vec<Measurement>,
}

impl Dataset {
    pub fn new(measurements: Vec<Measurement>) -> Self {
        Self { measurements }
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.measurements.iter()
    }

    pub fn into_measurements(self) -> Vec<Measurement> {
        self.measurements
    }

    /// Time vectors, aligned with [`Dataset::zones`]
    pub fn times(&self) -> Vec<TimeVector> {
        self.measurements.iter().map(|m| m.time).collect()
    }

    /// Zone vectors, aligned with [`Dataset::times`]
    pub fn zones(&self) -> Vec<ZoneVector> {
        self.measurements.iter().map(|m| m.zones).collect()
    }

    /// True if any measurement still carries a sentinel reading
    pub fn has_corruption(&self) -> bool {
        self.measurements.iter().any(Measurement::is_corrupted)
    }

    /// Stable sort into chronological order
    pub fn sort_chronologically(&mut self) {
        self.measurements.sort_by_key(|m| m.time);
    }
}

impl From<Vec<Measurement>> for Dataset {
    fn from(measurements: Vec<Measurement>) -> Self {
        Self::new(measurements)
    }
}

impl FromIterator<Measurement> for Dataset {
    fn from_iter<I: IntoIterator<Item = Measurement>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Dataset {
    type Item = Measurement;
    type IntoIter = std::vec::IntoIter<Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.measurements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Measurement;
    type IntoIter = std::slice::Iter<'a, Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.measurements.iter()
    }
}

/// Processing statistics for one pipeline run
#[derive(Debug, Clone)]
pub struct ProcessingStats {
    pub rows_read: usize,
    pub rows_corrupted: usize,
    pub rows_repaired: usize,
    pub rows_dropped: usize,
    pub buckets: usize,
    pub effective_fill_mode: FillMode,
    pub period: Period,
    pub output_path: Option<PathBuf>,
    pub processing_time_ms: u128,
}

/// Policy for repairing corrupted zone readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Replace corrupted readings with the most recent prior valid row
    ForwardFill,
    /// Replace corrupted readings with the nearest following valid row
    BackwardFill,
    /// Remove rows containing any corrupted reading
    Drop,
}

impl FillMode {
    pub fn name(&self) -> &'static str {
        match self {
            FillMode::ForwardFill => "forward fill",
            FillMode::BackwardFill => "backward fill",
            FillMode::Drop => "drop",
        }
    }

    /// Resolve a fill mode name, downgrading unknown names to [`FillMode::Drop`]
    pub fn resolve(name: &str, diagnostics: &mut dyn Diagnostics) -> Self {
        match name.parse() {
            Ok(mode) => mode,
            Err(_) => {
                diagnostics.warn(&format!(
                    "Invalid fill mode: {}. Falling back to dropping corrupted rows",
                    name
                ));
                FillMode::Drop
            }
        }
    }
}

impl fmt::Display for FillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FillMode {
    type Err = EnergyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_name(s).as_str() {
            "forward_fill" | "forwardfill" | "ffill" => Ok(FillMode::ForwardFill),
            "backward_fill" | "backwardfill" | "bfill" => Ok(FillMode::BackwardFill),
            "drop" => Ok(FillMode::Drop),
            _ => Err(EnergyError::UnknownFillMode {
                name: s.to_string(),
            }),
        }
    }
}

/// How zone readings sharing a bucket are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Sum,
    Mean,
}

/// Requested aggregation granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// Full timestamp precision
    None,
    Minute,
    Hour,
    Day,
    Month,
    /// Hour of the day across all dates (24 buckets)
    HourOfDay,
}

impl Period {
    pub const ALL: [Period; 6] = [
        Period::None,
        Period::Minute,
        Period::Hour,
        Period::Day,
        Period::Month,
        Period::HourOfDay,
    ];

    /// Time fields forming the bucket key for this period
    pub fn key_columns(&self) -> &'static [usize] {
        use time_index::*;
        match self {
            Period::None => &[YEAR, MONTH, DAY, HOUR, MINUTE, SECOND],
            Period::Minute => &[YEAR, MONTH, DAY, HOUR, MINUTE],
            Period::Hour => &[YEAR, MONTH, DAY, HOUR],
            Period::Day => &[YEAR, MONTH, DAY],
            Period::Month => &[YEAR, MONTH],
            Period::HourOfDay => &[HOUR],
        }
    }

    pub fn reducer(&self) -> Reducer {
        match self {
            Period::HourOfDay => Reducer::Mean,
            _ => Reducer::Sum,
        }
    }

    /// Number of buckets the output is padded to, if any
    pub fn padded_buckets(&self) -> Option<i64> {
        match self {
            Period::HourOfDay => Some(HOURS_PER_DAY),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Period::None => "none",
            Period::Minute => "minute",
            Period::Hour => "hour",
            Period::Day => "day",
            Period::Month => "month",
            Period::HourOfDay => "hour of the day",
        }
    }

    /// Report header describing the aggregation
    pub fn status(&self) -> &'static str {
        match self {
            Period::None => "Consumption per measurement",
            Period::Minute => "Consumption per minute",
            Period::Hour => "Consumption per hour",
            Period::Day => "Consumption per day",
            Period::Month => "Consumption per month",
            Period::HourOfDay => "Average consumption per hour of the day",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Period {
    type Err = EnergyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_name(s).as_str() {
            "none" | "raw" => Ok(Period::None),
            "minute" => Ok(Period::Minute),
            "hour" => Ok(Period::Hour),
            "day" => Ok(Period::Day),
            "month" => Ok(Period::Month),
            "hour_of_day" | "hour_of_the_day" | "hourly" => Ok(Period::HourOfDay),
            _ => Err(EnergyError::UnknownPeriod {
                name: s.to_string(),
            }),
        }
    }
}

/// Lowercase and fold spaces and dashes into underscores
fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectedDiagnostics;

    #[test]
    fn test_corruption_classification() {
        let clean = ZoneVector([1.0, 2.0, 0.0, 4.5]);
        assert!(!clean.is_corrupted());
        assert!(clean.corrupted_field_indexes().is_empty());

        let broken = ZoneVector([-1.0, 2.0, -1.0, 4.5]);
        assert!(broken.is_corrupted());
        assert_eq!(broken.corrupted_field_indexes(), vec![0, 2]);
    }

    #[test]
    fn test_sentinel_is_exact() {
        let near = ZoneVector([-1.0000001, -0.9999999, -2.0, 1.0]);
        assert!(!near.is_corrupted());
    }

    #[test]
    fn test_time_vector_ordering_is_chronological() {
        let earlier = TimeVector::new(2023, 1, 31, 23, 59, 59);
        let later = TimeVector::new(2023, 2, 1, 0, 0, 0);
        assert!(earlier < later);
    }

    #[test]
    fn test_time_vector_labels() {
        assert_eq!(TimeVector::new(0, 0, 0, 7, 0, 0).label(), "07:00:00");
        assert_eq!(
            TimeVector::new(2023, 3, 1, 12, 5, 9).label(),
            "2023-03-01 12:05:09"
        );
        assert!(TimeVector::new(2023, 13, 1, 0, 0, 0).to_datetime().is_none());
    }

    #[test]
    fn test_fill_mode_names() {
        assert_eq!("forward fill".parse::<FillMode>().unwrap(), FillMode::ForwardFill);
        assert_eq!("backward-fill".parse::<FillMode>().unwrap(), FillMode::BackwardFill);
        assert_eq!("DROP".parse::<FillMode>().unwrap(), FillMode::Drop);
        assert!("sideways".parse::<FillMode>().is_err());
    }

    #[test]
    fn test_unknown_fill_mode_resolves_to_drop() {
        let mut diagnostics = CollectedDiagnostics::default();
        let mode = FillMode::resolve("sideways", &mut diagnostics);

        assert_eq!(mode, FillMode::Drop);
        assert_eq!(diagnostics.messages().len(), 1);
        assert!(diagnostics.messages()[0].contains("Invalid fill mode: sideways"));
    }

    #[test]
    fn test_period_names_round_trip() {
        for period in Period::ALL {
            assert_eq!(period.name().parse::<Period>().unwrap(), period);
        }
        assert_eq!("hour_of_day".parse::<Period>().unwrap(), Period::HourOfDay);
        assert!("fortnight".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_reducers() {
        assert_eq!(Period::HourOfDay.reducer(), Reducer::Mean);
        for period in [Period::None, Period::Minute, Period::Hour, Period::Day, Period::Month] {
            assert_eq!(period.reducer(), Reducer::Sum);
        }
    }

    #[test]
    fn test_dataset_aligned_arrays() {
        let dataset = Dataset::new(vec![
            Measurement::new([2023, 1, 1, 0, 0, 0], [1.0, 2.0, 3.0, 4.0]),
            Measurement::new([2023, 1, 1, 0, 1, 0], [5.0, 6.0, 7.0, 8.0]),
        ]);

        assert_eq!(dataset.times().len(), dataset.zones().len());
        assert_eq!(dataset.zones()[1].total(), 26.0);
        assert!(!dataset.has_corruption());
    }
}

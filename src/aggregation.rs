//! Time-bucket aggregation engine.
//!
//! Each measurement's time vector is projected onto the key columns of the
//! requested [`Period`]. Measurements sharing a key are reduced column by
//! column (sum, or mean for hour-of-day) and a representative time vector is
//! rebuilt from the key. The hour-of-day period is padded to 24 buckets after
//! reduction, so padding never dilutes a real bucket's mean.

use crate::constants::{TIME_FIELDS, ZONE_FIELDS, time_index};
use crate::models::{Dataset, Measurement, Period, Reducer, TimeVector, ZoneVector};
use std::collections::BTreeMap;
use tracing::debug;

/// Projected subset of time fields identifying a bucket
pub type BucketKey = Vec<i64>;

/// Running per-zone totals for one bucket
#[derive(Debug, Clone, Copy, Default)]
struct BucketAccumulator {
    sums: [f64; ZONE_FIELDS],
    count: usize,
}

impl BucketAccumulator {
    fn add(&mut self, zones: &ZoneVector) {
        for (sum, reading) in self.sums.iter_mut().zip(zones.readings()) {
            *sum += reading;
        }
        self.count += 1;
    }

    fn reduce(&self, reducer: Reducer) -> ZoneVector {
        match reducer {
            Reducer::Sum => ZoneVector(self.sums),
            Reducer::Mean => {
                let count = self.count.max(1) as f64;
                ZoneVector(self.sums.map(|sum| sum / count))
            }
        }
    }
}

/// Project a time vector onto the key columns of `period`
pub fn project_key(time: &TimeVector, period: Period) -> BucketKey {
    period.key_columns().iter().map(|&column| time.0[column]).collect()
}

/// Rebuild a representative time vector from a bucket key.
///
/// Key fields are copied back by position. Absent day and month fields are
/// `1` when the key spans more than one column; every other absent field is
/// `0`.
pub fn reconstruct_time(key: &[i64], period: Period) -> TimeVector {
    let columns = period.key_columns();
    let wide_key = columns.len() > 1;

    let mut fields = [0i64; TIME_FIELDS];
    for (index, field) in fields.iter_mut().enumerate() {
        if wide_key && (index == time_index::DAY || index == time_index::MONTH) {
            *field = 1;
        }
    }
    for (&column, &value) in columns.iter().zip(key) {
        fields[column] = value;
    }

    TimeVector(fields)
}

/// Aggregate a cleaned dataset into one measurement per bucket.
///
/// The result is ordered by bucket key; callers wanting a specific order
/// should sort it themselves. Hour of day yields exactly 24 buckets as long
/// as every hour lies in `0..24`, which the reader enforces.
pub fn aggregate(dataset: &Dataset, period: Period) -> Dataset {
    if dataset.is_empty() {
        return dataset.clone();
    }

    let mut buckets: BTreeMap<BucketKey, BucketAccumulator> = BTreeMap::new();
    for measurement in dataset {
        buckets
            .entry(project_key(&measurement.time, period))
            .or_default()
            .add(&measurement.zones);
    }

    let reducer = period.reducer();
    let mut reduced: BTreeMap<BucketKey, ZoneVector> = buckets
        .into_iter()
        .map(|(key, accumulator)| (key, accumulator.reduce(reducer)))
        .collect();

    if let Some(bucket_count) = period.padded_buckets() {
        let before = reduced.len();
        for hour in 0..bucket_count {
            let mut time = TimeVector::default();
            time.0[time_index::HOUR] = hour;
            reduced
                .entry(project_key(&time, period))
                .or_insert_with(ZoneVector::zero);
        }
        debug!("Padded {} empty {} buckets", reduced.len() - before, period);
    }

    debug!(
        "Aggregated {} measurements into {} {} buckets",
        dataset.len(),
        reduced.len(),
        period
    );

    reduced
        .into_iter()
        .map(|(key, zones)| Measurement {
            time: reconstruct_time(&key, period),
            zones,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(rows: &[([i64; 6], [f64; 4])]) -> Dataset {
        rows.iter()
            .map(|(time, zones)| Measurement::new(*time, *zones))
            .collect()
    }

    #[test]
    fn test_empty_dataset_is_returned_unchanged() {
        for period in Period::ALL {
            assert!(aggregate(&Dataset::default(), period).is_empty());
        }
    }

    #[test]
    fn test_minute_sums_zone_columns() {
        let input = dataset(&[
            ([2023, 4, 2, 10, 15, 0], [1.0, 2.0, 3.0, 4.0]),
            ([2023, 4, 2, 10, 15, 30], [5.0, 6.0, 7.0, 8.0]),
        ]);
        let output = aggregate(&input, Period::Minute);

        assert_eq!(output.len(), 1);
        assert_eq!(output.measurements()[0].zones.0, [6.0, 8.0, 10.0, 12.0]);
        assert_eq!(output.measurements()[0].time, TimeVector::new(2023, 4, 2, 10, 15, 0));
    }

    #[test]
    fn test_hour_of_day_pads_to_24_without_diluting_mean() {
        let input = dataset(&[([2023, 1, 1, 5, 0, 0], [10.0, 0.0, 0.0, 0.0])]);
        let output = aggregate(&input, Period::HourOfDay);

        assert_eq!(output.len(), 24);
        for measurement in &output {
            if measurement.time.hour() == 5 {
                assert_eq!(measurement.zones.0, [10.0, 0.0, 0.0, 0.0]);
            } else {
                assert_eq!(measurement.zones, ZoneVector::zero());
            }
        }
    }

    #[test]
    fn test_hour_of_day_averages_across_days() {
        let input = dataset(&[
            ([2023, 1, 1, 8, 0, 0], [2.0, 4.0, 6.0, 8.0]),
            ([2023, 1, 2, 8, 30, 0], [4.0, 8.0, 12.0, 16.0]),
            ([2023, 1, 3, 9, 0, 0], [1.0, 1.0, 1.0, 1.0]),
        ]);
        let output = aggregate(&input, Period::HourOfDay);

        let eight = output.iter().find(|m| m.time.hour() == 8).unwrap();
        assert_eq!(eight.zones.0, [3.0, 6.0, 9.0, 12.0]);
        assert_eq!(eight.time, TimeVector::new(0, 0, 0, 8, 0, 0));
        assert_eq!(output.len(), 24);
    }

    #[test]
    fn test_hour_of_day_with_all_hours_present() {
        let rows: Vec<([i64; 6], [f64; 4])> = (0..24)
            .map(|hour| ([2023, 6, 1, hour, 0, 0], [1.0, 1.0, 1.0, 1.0]))
            .collect();
        let output = aggregate(&dataset(&rows), Period::HourOfDay);

        assert_eq!(output.len(), 24);
        assert!(output.iter().all(|m| m.zones.0 == [1.0; 4]));
    }

    #[test]
    fn test_none_period_collapses_identical_timestamps_only() {
        let input = dataset(&[
            ([2023, 1, 1, 0, 0, 0], [1.0, 1.0, 1.0, 1.0]),
            ([2023, 1, 1, 0, 0, 0], [2.0, 2.0, 2.0, 2.0]),
            ([2023, 1, 1, 0, 0, 1], [3.0, 3.0, 3.0, 3.0]),
        ]);
        let output = aggregate(&input, Period::None);

        assert_eq!(output.len(), 2);
        assert_eq!(output.measurements()[0].zones.0, [3.0; 4]);
        assert_eq!(output.measurements()[1].time, TimeVector::new(2023, 1, 1, 0, 0, 1));
    }

    #[test]
    fn test_day_and_month_buckets() {
        let input = dataset(&[
            ([2023, 2, 10, 1, 0, 0], [1.0, 0.0, 0.0, 0.0]),
            ([2023, 2, 10, 23, 0, 0], [1.0, 0.0, 0.0, 0.0]),
            ([2023, 2, 11, 0, 0, 0], [1.0, 0.0, 0.0, 0.0]),
            ([2023, 3, 1, 0, 0, 0], [5.0, 0.0, 0.0, 0.0]),
        ]);

        let days = aggregate(&input, Period::Day);
        assert_eq!(days.len(), 3);
        assert_eq!(days.measurements()[0].zones.0[0], 2.0);
        assert_eq!(days.measurements()[0].time, TimeVector::new(2023, 2, 10, 0, 0, 0));

        let months = aggregate(&input, Period::Month);
        assert_eq!(months.len(), 2);
        assert_eq!(months.measurements()[0].zones.0[0], 3.0);
        assert_eq!(months.measurements()[0].time, TimeVector::new(2023, 2, 1, 0, 0, 0));
    }

    #[test]
    fn test_key_round_trip_uses_canonical_defaults() {
        let time = TimeVector::new(2024, 7, 19, 13, 42, 7);

        let expectations = [
            (Period::None, TimeVector::new(2024, 7, 19, 13, 42, 7)),
            (Period::Minute, TimeVector::new(2024, 7, 19, 13, 42, 0)),
            (Period::Hour, TimeVector::new(2024, 7, 19, 13, 0, 0)),
            (Period::Day, TimeVector::new(2024, 7, 19, 0, 0, 0)),
            (Period::Month, TimeVector::new(2024, 7, 1, 0, 0, 0)),
            (Period::HourOfDay, TimeVector::new(0, 0, 0, 13, 0, 0)),
        ];

        for (period, expected) in expectations {
            let key = project_key(&time, period);
            assert_eq!(key.len(), period.key_columns().len());
            assert_eq!(reconstruct_time(&key, period), expected, "period {}", period);
        }
    }

    #[test]
    fn test_output_has_no_sentinel_for_clean_input() {
        let input = dataset(&[
            ([2023, 1, 1, 0, 0, 0], [0.5, 0.5, 0.5, 0.5]),
            ([2023, 1, 1, 1, 0, 0], [0.5, 0.5, 0.5, 0.5]),
        ]);
        for period in Period::ALL {
            assert!(!aggregate(&input, period).has_corruption());
        }
    }
}

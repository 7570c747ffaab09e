//! Gap-fill engine for corrupted zone readings.
//!
//! Rows whose zone vector contains the corruption sentinel are repaired
//! according to a [`FillMode`]:
//!
//! - forward fill copies corrupted fields from the most recent prior valid row
//! - backward fill copies them from the nearest following valid row
//! - drop removes the row entirely
//!
//! A fill direction needs a valid anchor at the end it starts from. When the
//! first row is corrupted (forward) or the last row is corrupted (backward)
//! the request is downgraded to drop and a warning is emitted on the
//! [`Diagnostics`] channel. Downgrades are never fatal.

use crate::diagnostics::Diagnostics;
use crate::models::{Dataset, FillMode, Measurement, ZoneVector};
use tracing::debug;

/// Counters describing what a repair pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairSummary {
    pub requested_mode: FillMode,
    pub effective_mode: FillMode,
    pub rows_read: usize,
    pub rows_corrupted: usize,
    pub rows_repaired: usize,
    pub rows_dropped: usize,
}

impl RepairSummary {
    pub fn was_downgraded(&self) -> bool {
        self.requested_mode != self.effective_mode
    }
}

/// Repaired dataset together with its summary
#[derive(Debug, Clone)]
pub struct RepairOutcome {
    pub dataset: Dataset,
    pub summary: RepairSummary,
}

/// Repair corrupted rows and return the cleaned dataset
pub fn load_and_repair(
    rows: Vec<Measurement>,
    fill_mode: FillMode,
    diagnostics: &mut dyn Diagnostics,
) -> Dataset {
    repair(rows, fill_mode, diagnostics).dataset
}

/// Repair corrupted rows, reporting counts alongside the cleaned dataset
pub fn repair(
    rows: Vec<Measurement>,
    fill_mode: FillMode,
    diagnostics: &mut dyn Diagnostics,
) -> RepairOutcome {
    let rows_read = rows.len();
    let rows_corrupted = rows.iter().filter(|row| row.is_corrupted()).count();
    let effective_mode = enforce_fill_mode(fill_mode, &rows, diagnostics);

    debug!(
        "Repairing {} rows ({} corrupted) with {}",
        rows_read, rows_corrupted, effective_mode
    );

    let repaired: Vec<Measurement> = match effective_mode {
        FillMode::ForwardFill => forward_fill(rows),
        FillMode::BackwardFill => backward_fill(rows),
        FillMode::Drop => rows.into_iter().filter(|row| !row.is_corrupted()).collect(),
    };

    let rows_dropped = rows_read - repaired.len();
    let summary = RepairSummary {
        requested_mode: fill_mode,
        effective_mode,
        rows_read,
        rows_corrupted,
        rows_repaired: rows_corrupted - rows_dropped,
        rows_dropped,
    };

    RepairOutcome {
        dataset: Dataset::new(repaired),
        summary,
    }
}

/// Downgrade the requested mode to drop when the data has no valid anchor
/// at the end the fill direction starts from
pub fn enforce_fill_mode(
    requested: FillMode,
    rows: &[Measurement],
    diagnostics: &mut dyn Diagnostics,
) -> FillMode {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return requested;
    };

    let unanchored_end = match requested {
        FillMode::ForwardFill if first.is_corrupted() => "first",
        FillMode::BackwardFill if last.is_corrupted() => "last",
        _ => return requested,
    };

    diagnostics.warn(&format!(
        "Could not {} corrupted rows as {} row is corrupted. Falling back to dropping corrupted rows",
        requested, unanchored_end
    ));
    FillMode::Drop
}

/// Copy each corrupted field from `source` by position
fn patch(zones: ZoneVector, source: &ZoneVector) -> ZoneVector {
    let mut patched = zones;
    for index in zones.corrupted_field_indexes() {
        patched.0[index] = source.0[index];
    }
    patched
}

fn forward_fill(rows: Vec<Measurement>) -> Vec<Measurement> {
    let mut last_valid: Option<ZoneVector> = None;
    let mut repaired = Vec::with_capacity(rows.len());

    for row in rows {
        if !row.is_corrupted() {
            last_valid = Some(row.zones);
            repaired.push(row);
        } else if let Some(source) = &last_valid {
            repaired.push(Measurement {
                time: row.time,
                zones: patch(row.zones, source),
            });
        }
    }

    repaired
}

fn backward_fill(rows: Vec<Measurement>) -> Vec<Measurement> {
    // Nearest valid zone vector at or after each row
    let mut next_valid: Vec<Option<ZoneVector>> = vec![None; rows.len()];
    let mut upcoming: Option<ZoneVector> = None;
    for (index, row) in rows.iter().enumerate().rev() {
        if !row.is_corrupted() {
            upcoming = Some(row.zones);
        }
        next_valid[index] = upcoming;
    }

    rows.into_iter()
        .zip(next_valid)
        .filter_map(|(row, source)| {
            if !row.is_corrupted() {
                return Some(row);
            }
            source.map(|source| Measurement {
                time: row.time,
                zones: patch(row.zones, &source),
            })
        })
        .collect()
}

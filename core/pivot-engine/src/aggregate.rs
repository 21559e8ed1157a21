//! FILENAME: core/pivot-engine/src/aggregate.rs
//! Aggregation - sums the measure field over the records of one cell.
//!
//! A cell is a row group's record subset further restricted to one header
//! path. Header values are compared by their original type, and the
//! measure is widened to a real number, so integer and real measures sum
//! together.

use records::{FieldAccessor, FieldHandle, FieldValue};
use serde::{Deserialize, Serialize};

use crate::error::{PivotError, PivotResult};
use crate::header::ColumnFields;

/// Running sum of a measure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateAccumulator {
    pub sum: f64,
    pub count: u64,
}

impl AggregateAccumulator {
    pub fn new() -> Self {
        AggregateAccumulator { sum: 0.0, count: 0 }
    }

    /// Adds a numeric value to the accumulator.
    pub fn add_number(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
    }

    /// Adds a measure value; text values do not contribute.
    pub fn add_value(&mut self, value: &FieldValue) {
        if let Some(n) = value.to_number() {
            self.add_number(n);
        }
    }

    /// The total; exactly 0.0 when nothing was added.
    pub fn total(&self) -> f64 {
        self.sum
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Sums `measure` over the records whose column values equal `path`.
///
/// `path` may be shorter than the configured column fields, in which case
/// the remaining levels are unconstrained (a subtotal over that prefix).
/// A path longer than the configured fields fails with
/// `PivotError::FieldNotConfigured`.
pub fn sum<'r, R, I>(
    accessor: &FieldAccessor<R>,
    records: I,
    columns: &ColumnFields,
    path: &[FieldValue],
    measure: FieldHandle,
) -> PivotResult<AggregateAccumulator>
where
    R: 'r,
    I: IntoIterator<Item = &'r R>,
{
    if path.len() > columns.len() {
        return Err(PivotError::FieldNotConfigured {
            level: columns.len(),
            configured: columns.len(),
        });
    }
    Ok(accumulate(accessor, records, columns.handles(), path, measure))
}

/// Unchecked form of [`sum`]: pairs `handles` with `path` level by level.
pub(crate) fn accumulate<'r, R, I>(
    accessor: &FieldAccessor<R>,
    records: I,
    handles: &[FieldHandle],
    path: &[FieldValue],
    measure: FieldHandle,
) -> AggregateAccumulator
where
    R: 'r,
    I: IntoIterator<Item = &'r R>,
{
    let mut acc = AggregateAccumulator::new();

    for record in records {
        let matches = handles
            .iter()
            .zip(path)
            .all(|(&h, expected)| accessor.extract(h, record) == *expected);

        if matches {
            acc.add_value(&accessor.extract(measure, record));
        }
    }

    acc
}

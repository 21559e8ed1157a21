//! FILENAME: core/pivot-engine/src/filter.rs
//! Record filter - decides which source records take part in a pivot.
//!
//! Constraints combine with AND across fields and OR across the allowed
//! values of one field. Comparison follows the record value's type:
//! - text values compare against the allowed value's text
//! - integer values compare against the allowed value parsed as an integer
//! - real values compare against the allowed value parsed as a real
//!
//! An allowed value that does not parse for the record's type only skips
//! that one comparison.

use records::{FieldAccessor, FieldHandle, FieldKind, FieldValue};

use crate::definition::FilterSpec;
use crate::error::{FieldStage, PivotError, PivotResult};

#[derive(Debug, Clone)]
struct ResolvedConstraint {
    handle: FieldHandle,
    allowed: Vec<FieldValue>,
}

/// A [`FilterSpec`] resolved against one accessor table.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    constraints: Vec<ResolvedConstraint>,
}

impl RecordFilter {
    /// Resolves every constrained field name. Unknown names fail with the
    /// `Filter` stage.
    pub fn resolve<R>(spec: &FilterSpec, accessor: &FieldAccessor<R>) -> PivotResult<Self> {
        let mut constraints: Vec<ResolvedConstraint> = Vec::with_capacity(spec.len());

        for filter in spec.iter() {
            let handle = accessor
                .resolve(&filter.field)
                .map_err(|_| PivotError::field_not_found(FieldStage::Filter, &filter.field))?;

            let kind = accessor.kind(handle);
            for value in &filter.allowed {
                if !can_match(kind, value) {
                    log::warn!(
                        target: "pivot",
                        "allowed value '{}' cannot match {} field '{}', skipping it",
                        value,
                        kind,
                        filter.field
                    );
                }
            }

            // A field listed twice is one OR list, as with `FilterSpec::allow`
            match constraints.iter_mut().find(|c| c.handle == handle) {
                Some(existing) => existing.allowed.extend(filter.allowed.iter().cloned()),
                None => constraints.push(ResolvedConstraint {
                    handle,
                    allowed: filter.allowed.clone(),
                }),
            }
        }

        Ok(RecordFilter { constraints })
    }

    /// True when no constraint is configured.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Evaluates every constraint against one record.
    pub fn passes<R>(&self, accessor: &FieldAccessor<R>, record: &R) -> bool {
        self.constraints.iter().all(|c| {
            let value = accessor.extract(c.handle, record);
            c.allowed.iter().any(|allowed| value_matches(&value, allowed))
        })
    }
}

/// Checks one record against a filter spec, resolving field names on the way.
pub fn passes<R>(accessor: &FieldAccessor<R>, record: &R, spec: &FilterSpec) -> PivotResult<bool> {
    let filter = RecordFilter::resolve(spec, accessor)?;
    Ok(filter.passes(accessor, record))
}

/// Type-aware equality between a record value and one allowed value.
pub fn value_matches(record_value: &FieldValue, allowed: &FieldValue) -> bool {
    match record_value {
        FieldValue::Text(s) => allowed.label() == *s,
        FieldValue::Integer(n) => allowed.coerce_integer() == Some(*n),
        FieldValue::Real(x) => allowed.coerce_real() == Some(*x),
    }
}

fn can_match(kind: FieldKind, allowed: &FieldValue) -> bool {
    match kind {
        FieldKind::Text => true,
        FieldKind::Integer => allowed.coerce_integer().is_some(),
        FieldKind::Real => allowed.coerce_real().is_some(),
    }
}

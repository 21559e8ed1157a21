//! FILENAME: core/pivot-engine/src/definition.rs
//! Pivot Table Definition - The serializable configuration.
//!
//! This module contains all the types needed to DESCRIBE a pivot table.
//! These structures are designed to be:
//! - Serializable (for saving/loading and handing over from a UI)
//! - Validated against a record schema before any record is processed
//! - Immutable snapshots of user intent

use records::{FieldAccessor, FieldHandle, FieldValue};
use serde::{Deserialize, Serialize};

use crate::error::{FieldStage, PivotError, PivotResult};
use crate::filter::RecordFilter;
use crate::header::ColumnFields;

/// Maximum number of nested column dimensions.
pub const MAX_COLUMN_FIELDS: usize = 3;

/// Text shown for cells whose total is exactly zero.
pub const DEFAULT_ZERO_PLACEHOLDER: &str = "-";

/// Width units of one leaf column, for renderers that lay out by width.
pub const DEFAULT_LEAF_WIDTH: u32 = 120;

// ============================================================================
// FILTER DEFINITIONS
// ============================================================================

/// Allowed values for one field. A record matches when its value equals
/// any one of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub allowed: Vec<FieldValue>,
}

/// A set of field constraints, combined with AND.
/// An empty spec admits every record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec {
    filters: Vec<FieldFilter>,
}

impl FilterSpec {
    pub fn new() -> Self {
        FilterSpec::default()
    }

    /// Adds allowed values for a field. Repeating a field extends its list.
    pub fn allow<V, I>(mut self, field: &str, values: I) -> Self
    where
        V: Into<FieldValue>,
        I: IntoIterator<Item = V>,
    {
        let values = values.into_iter().map(Into::into);
        match self.filters.iter_mut().find(|f| f.field == field) {
            Some(existing) => existing.allowed.extend(values),
            None => self.filters.push(FieldFilter {
                field: field.to_string(),
                allowed: values.collect(),
            }),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldFilter> {
        self.filters.iter()
    }
}

// ============================================================================
// LAYOUT OPTIONS
// ============================================================================

/// Display options carried through to the output table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotLayout {
    /// Text for cells whose total is exactly zero.
    #[serde(default = "default_zero_placeholder")]
    pub zero_placeholder: String,

    /// Width units of one leaf column.
    #[serde(default = "default_leaf_width")]
    pub leaf_width: u32,
}

fn default_zero_placeholder() -> String {
    DEFAULT_ZERO_PLACEHOLDER.to_string()
}

fn default_leaf_width() -> u32 {
    DEFAULT_LEAF_WIDTH
}

impl Default for PivotLayout {
    fn default() -> Self {
        PivotLayout {
            zero_placeholder: default_zero_placeholder(),
            leaf_width: DEFAULT_LEAF_WIDTH,
        }
    }
}

// ============================================================================
// MAIN DEFINITION STRUCT
// ============================================================================

/// The complete, serializable definition of a pivot table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotDefinition {
    /// Fields placed in the Column area (outer to inner, at most three).
    #[serde(default)]
    pub column_fields: Vec<String>,

    /// Fields placed in the Row area (outer to inner).
    #[serde(default)]
    pub row_fields: Vec<String>,

    /// The numeric field summed into every cell.
    pub measure_field: String,

    /// Record filter applied before grouping.
    #[serde(default)]
    pub filter: FilterSpec,

    #[serde(default)]
    pub layout: PivotLayout,
}

impl PivotDefinition {
    /// Creates a definition with no dimensions and no filter.
    pub fn new(measure_field: &str) -> Self {
        PivotDefinition {
            column_fields: Vec::new(),
            row_fields: Vec::new(),
            measure_field: measure_field.to_string(),
            filter: FilterSpec::default(),
            layout: PivotLayout::default(),
        }
    }

    pub fn with_columns(mut self, fields: &[&str]) -> Self {
        self.column_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_rows(mut self, fields: &[&str]) -> Self {
        self.row_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_layout(mut self, layout: PivotLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Parses a definition from JSON.
    pub fn from_json(input: &str) -> PivotResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Validates the definition against a record schema and resolves every
    /// field name once.
    pub fn resolve<R>(&self, accessor: &FieldAccessor<R>) -> PivotResult<ResolvedDefinition> {
        if self.column_fields.len() > MAX_COLUMN_FIELDS {
            return Err(PivotError::TooManyColumnFields {
                count: self.column_fields.len(),
                max: MAX_COLUMN_FIELDS,
            });
        }

        let filter = RecordFilter::resolve(&self.filter, accessor)?;
        let columns = ColumnFields::resolve(&self.column_fields, accessor)?;

        let rows = self
            .row_fields
            .iter()
            .map(|name| {
                accessor
                    .resolve(name)
                    .map_err(|_| PivotError::field_not_found(FieldStage::Row, name))
            })
            .collect::<PivotResult<Vec<FieldHandle>>>()?;

        let measure = accessor
            .resolve(&self.measure_field)
            .map_err(|_| PivotError::field_not_found(FieldStage::Measure, &self.measure_field))?;

        let kind = accessor.kind(measure);
        if !kind.is_numeric() {
            return Err(PivotError::NonNumericMeasure {
                field: self.measure_field.clone(),
                kind,
            });
        }

        Ok(ResolvedDefinition {
            filter,
            columns,
            rows,
            measure,
        })
    }
}

/// A definition whose field names have all been resolved against one
/// accessor table.
#[derive(Debug, Clone)]
pub struct ResolvedDefinition {
    pub filter: RecordFilter,
    pub columns: ColumnFields,
    pub rows: Vec<FieldHandle>,
    pub measure: FieldHandle,
}

//! FILENAME: core/pivot-engine/src/view.rs
//! Pivot View - Renderable output for the frontend.
//!
//! The finished table a renderer consumes. It includes:
//! - The column header hierarchy (header rows and leaf columns)
//! - The row grouping tree, plus its depth-first flattening into data rows
//! - One cell per (data row, leaf column) with a display string and a
//!   background style hint
//!
//! A `PivotTable` is immutable once built; any configuration change builds
//! a new one.

use records::FieldValue;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::definition::PivotLayout;
use crate::group::{find_group, RowGroupNode};
use crate::header::{HeaderHierarchy, HeaderPath, HeaderSpan};

// ============================================================================
// CELLS
// ============================================================================

/// Background style hints for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackgroundStyle {
    /// Rows of the outermost row field.
    OuterGroup,
    /// Rows of the innermost row field.
    InnerGroup,
    /// Rows at any depth in between.
    Normal,
}

impl Default for BackgroundStyle {
    fn default() -> Self {
        BackgroundStyle::Normal
    }
}

impl BackgroundStyle {
    /// Style for a row at `depth` when `row_field_count` row fields are
    /// configured. The outermost depth wins when it is also the innermost.
    pub fn for_depth(depth: usize, row_field_count: usize) -> Self {
        if depth == 0 {
            BackgroundStyle::OuterGroup
        } else if depth + 1 == row_field_count {
            BackgroundStyle::InnerGroup
        } else {
            BackgroundStyle::Normal
        }
    }
}

/// One aggregated cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotCell {
    /// Raw sum of the measure.
    pub total: f64,

    /// Pre-formatted display string.
    pub display: String,

    pub background: BackgroundStyle,

    /// Number of records that contributed to `total`.
    pub record_count: u64,
}

impl PivotCell {
    pub fn new(total: f64, record_count: u64, background: BackgroundStyle, layout: &PivotLayout) -> Self {
        PivotCell {
            total,
            display: format_total(total, &layout.zero_placeholder),
            background,
            record_count,
        }
    }

    /// True when the display shows the zero placeholder.
    pub fn is_zero(&self) -> bool {
        self.total == 0.0
    }
}

/// Display text for a cell total: the placeholder for exactly zero,
/// otherwise the real-number label (`2500.0`).
pub fn format_total(total: f64, zero_placeholder: &str) -> String {
    if total == 0.0 {
        zero_placeholder.to_string()
    } else {
        FieldValue::Real(total).label()
    }
}

// ============================================================================
// ROWS
// ============================================================================

/// A data row: one row group node, with its cells in leaf-column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotRow {
    /// Group keys from the outermost row field down to this row.
    pub path: Vec<FieldValue>,

    /// Row label (the label of the last key).
    pub label: String,

    /// Nesting depth (0 = outermost).
    pub depth: usize,

    /// Index of the parent row (if any).
    pub parent_index: Option<usize>,

    pub background: BackgroundStyle,

    pub cells: Vec<PivotCell>,
}

/// Counts describing a built table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotStats {
    pub total_records: usize,
    pub filtered_records: usize,
    pub row_count: usize,
    pub leaf_columns: usize,
}

// ============================================================================
// MAIN TABLE STRUCT
// ============================================================================

/// The complete output of one pivot build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotTable {
    pub(crate) column_fields: Vec<String>,
    pub(crate) row_fields: Vec<String>,
    pub(crate) measure_field: String,
    pub(crate) layout: PivotLayout,
    pub(crate) hierarchy: HeaderHierarchy,
    pub(crate) row_groups: Vec<RowGroupNode>,
    pub(crate) leaf_paths: Vec<HeaderPath>,
    pub(crate) rows: Vec<PivotRow>,
    /// Source indices of the records that passed the filter.
    pub(crate) filtered: Vec<usize>,
    pub(crate) stats: PivotStats,
    #[serde(skip)]
    pub(crate) leaf_index: FxHashMap<HeaderPath, usize>,
    #[serde(skip)]
    pub(crate) row_index: FxHashMap<Vec<FieldValue>, usize>,
}

impl PivotTable {
    pub fn column_fields(&self) -> &[String] {
        &self.column_fields
    }

    pub fn row_fields(&self) -> &[String] {
        &self.row_fields
    }

    pub fn measure_field(&self) -> &str {
        &self.measure_field
    }

    pub fn layout(&self) -> &PivotLayout {
        &self.layout
    }

    pub fn hierarchy(&self) -> &HeaderHierarchy {
        &self.hierarchy
    }

    /// Top-level row groups.
    pub fn row_groups(&self) -> &[RowGroupNode] {
        &self.row_groups
    }

    /// Row group at the end of a key path.
    pub fn row_group(&self, row_path: &[FieldValue]) -> Option<&RowGroupNode> {
        find_group(&self.row_groups, row_path)
    }

    /// Leaf header paths in drawing order; one cell per leaf in every row.
    pub fn leaf_paths(&self) -> &[HeaderPath] {
        &self.leaf_paths
    }

    /// Data rows, depth-first and pre-order: every row is followed by its
    /// children's rows.
    pub fn rows(&self) -> &[PivotRow] {
        &self.rows
    }

    /// Header spans per configured column level.
    pub fn header_rows(&self) -> Vec<Vec<HeaderSpan>> {
        self.hierarchy.header_rows()
    }

    /// Source indices of the records that passed the filter.
    pub fn filtered_records(&self) -> &[usize] {
        &self.filtered
    }

    pub fn stats(&self) -> &PivotStats {
        &self.stats
    }

    /// Looks up a cell by row key path and full header path.
    pub fn cell(&self, row_path: &[FieldValue], col_path: &[FieldValue]) -> Option<&PivotCell> {
        let row = self.row_index.get(row_path)?;
        let col = self.leaf_index.get(col_path)?;
        self.rows.get(*row).and_then(|r| r.cells.get(*col))
    }

    /// Data row at the end of a key path.
    pub fn row(&self, row_path: &[FieldValue]) -> Option<&PivotRow> {
        self.row_index.get(row_path).and_then(|&i| self.rows.get(i))
    }

    /// Number of leaf columns under a header prefix.
    pub fn leaf_count(&self, prefix: &[FieldValue]) -> usize {
        self.hierarchy.leaf_count(prefix)
    }

    /// Width of the header cell for a prefix, in the layout's width units.
    /// Saturates at `u64::MAX`.
    pub fn column_width(&self, prefix: &[FieldValue]) -> u64 {
        (self.leaf_count(prefix) as u64).saturating_mul(u64::from(self.layout.leaf_width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_follows_depth() {
        assert_eq!(BackgroundStyle::for_depth(0, 3), BackgroundStyle::OuterGroup);
        assert_eq!(BackgroundStyle::for_depth(1, 3), BackgroundStyle::Normal);
        assert_eq!(BackgroundStyle::for_depth(2, 3), BackgroundStyle::InnerGroup);
        assert_eq!(BackgroundStyle::for_depth(1, 2), BackgroundStyle::InnerGroup);
        assert_eq!(BackgroundStyle::for_depth(0, 1), BackgroundStyle::OuterGroup);
    }

    #[test]
    fn zero_totals_use_the_placeholder() {
        assert_eq!(format_total(0.0, "-"), "-");
        assert_eq!(format_total(-0.0, "n/a"), "n/a");
        assert_eq!(format_total(2500.0, "-"), "2500.0");
        assert_eq!(format_total(0.5, "-"), "0.5");

        let cell = PivotCell::new(0.0, 0, BackgroundStyle::Normal, &PivotLayout::default());
        assert_eq!(cell.display, "-");
        assert!(cell.is_zero());
    }
}

//! FILENAME: core/pivot-engine/src/engine.rs
//! Pivot Engine - The calculation core that turns records into a table.
//!
//! This module takes a PivotDefinition (configuration), a FieldAccessor
//! (schema) and a record slice (data) and produces a PivotTable.
//!
//! Algorithm:
//! 1. Validate and resolve the definition against the schema
//! 2. Filter the records
//! 3. Build the column header hierarchy and the row grouping tree
//! 4. Cross-tabulate: for each (row group, leaf header path) pair, sum the
//!    measure over the group's records restricted to that path
//! 5. Flatten the row tree depth-first into data rows with cell styles
//!
//! Steps 4 and 5 write into freshly allocated output only; nothing from an
//! earlier build is reused.

use std::time::Instant;

use records::{FieldAccessor, FieldValue};
use rustc_hash::FxHashMap;

use crate::aggregate::{accumulate, AggregateAccumulator};
use crate::definition::{PivotDefinition, ResolvedDefinition};
use crate::error::{PivotError, PivotResult};
use crate::group::{group_subset, RowGroupNode};
use crate::header::{ColumnFields, HeaderHierarchy, HeaderPath};
use crate::view::{BackgroundStyle, PivotCell, PivotRow, PivotStats, PivotTable};

// ============================================================================
// PIVOT TABLE BUILDER
// ============================================================================

/// A validated pivot configuration bound to one record schema.
///
/// Construction checks every field reference, so `build` itself cannot
/// fail and can be repeated for new data with the same schema.
pub struct PivotTableBuilder<'a, R> {
    accessor: &'a FieldAccessor<R>,
    definition: PivotDefinition,
    resolved: ResolvedDefinition,
}

impl<'a, R> PivotTableBuilder<'a, R> {
    /// Validates `definition` against `accessor`.
    pub fn new(accessor: &'a FieldAccessor<R>, definition: PivotDefinition) -> PivotResult<Self> {
        let resolved = definition.resolve(accessor)?;
        Ok(PivotTableBuilder {
            accessor,
            definition,
            resolved,
        })
    }

    pub fn definition(&self) -> &PivotDefinition {
        &self.definition
    }

    /// Executes the full calculation over `records`.
    pub fn build(&self, records: &[R]) -> PivotTable {
        let started = Instant::now();

        // Step 1: Filter
        let filtered: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.resolved.filter.passes(self.accessor, *r))
            .map(|(i, _)| i)
            .collect();

        // Step 2: Column headers
        let hierarchy = HeaderHierarchy::build(
            self.accessor,
            filtered.iter().map(|&i| &records[i]),
            &self.resolved.columns,
        );
        let leaf_paths = hierarchy.leaf_paths();

        // Step 3: Row groups
        let row_groups = group_subset(self.accessor, records, &filtered, &self.resolved.rows);

        // Step 4: Cross-tabulate into flattened rows
        let mut rows = Vec::new();
        self.flatten_rows(records, &row_groups, &leaf_paths, &[], None, &mut rows);

        let leaf_index: FxHashMap<HeaderPath, usize> = leaf_paths
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i))
            .collect();
        let row_index: FxHashMap<Vec<FieldValue>, usize> = rows
            .iter()
            .enumerate()
            .map(|(i, r)| (r.path.clone(), i))
            .collect();

        let stats = PivotStats {
            total_records: records.len(),
            filtered_records: filtered.len(),
            row_count: rows.len(),
            leaf_columns: leaf_paths.len(),
        };

        log::debug!(
            target: "pivot",
            "built pivot: {}/{} records, {} rows x {} columns in {:?}",
            stats.filtered_records,
            stats.total_records,
            stats.row_count,
            stats.leaf_columns,
            started.elapsed()
        );

        PivotTable {
            column_fields: self.definition.column_fields.clone(),
            row_fields: self.definition.row_fields.clone(),
            measure_field: self.definition.measure_field.clone(),
            layout: self.definition.layout.clone(),
            hierarchy,
            row_groups,
            leaf_paths,
            rows,
            filtered,
            stats,
            leaf_index,
            row_index,
        }
    }

    /// Appends one data row per node, each followed by its descendants.
    fn flatten_rows(
        &self,
        records: &[R],
        nodes: &[RowGroupNode],
        leaf_paths: &[HeaderPath],
        parent_path: &[FieldValue],
        parent_index: Option<usize>,
        out: &mut Vec<PivotRow>,
    ) {
        let row_field_count = self.resolved.rows.len();

        for node in nodes {
            let mut path = parent_path.to_vec();
            path.push(node.key.clone());

            let background = BackgroundStyle::for_depth(node.depth, row_field_count);
            let cells = leaf_paths
                .iter()
                .map(|leaf| {
                    let acc = self.aggregate(records, node, leaf);
                    PivotCell::new(acc.total(), acc.count, background, &self.definition.layout)
                })
                .collect();

            let index = out.len();
            out.push(PivotRow {
                path: path.clone(),
                label: node.label.clone(),
                depth: node.depth,
                parent_index,
                background,
                cells,
            });

            self.flatten_rows(records, &node.children, leaf_paths, &path, Some(index), out);
        }
    }

    fn aggregate(&self, records: &[R], node: &RowGroupNode, leaf: &HeaderPath) -> AggregateAccumulator {
        accumulate(
            self.accessor,
            node.records.iter().map(|&i| &records[i]),
            self.resolved.columns.handles(),
            leaf,
            self.resolved.measure,
        )
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Validates `definition` and builds a pivot table over `records`.
/// This is the main entry point for the calculation engine.
pub fn build_pivot<R>(
    records: &[R],
    accessor: &FieldAccessor<R>,
    definition: &PivotDefinition,
) -> PivotResult<PivotTable> {
    let builder = PivotTableBuilder::new(accessor, definition.clone())?;
    Ok(builder.build(records))
}

/// Source indices of the records behind one cell of `table`.
///
/// `records` and `accessor` must be the ones the table was built from. An
/// empty `row_path` covers every filtered record; `col_path` may be any
/// prefix of a header path.
pub fn drill_down<R>(
    table: &PivotTable,
    accessor: &FieldAccessor<R>,
    records: &[R],
    row_path: &[FieldValue],
    col_path: &[FieldValue],
) -> PivotResult<Vec<usize>> {
    let columns = ColumnFields::resolve(&table.column_fields, accessor)?;
    if col_path.len() > columns.len() {
        return Err(PivotError::FieldNotConfigured {
            level: columns.len(),
            configured: columns.len(),
        });
    }

    let candidates: &[usize] = if row_path.is_empty() {
        &table.filtered
    } else {
        match table.row_group(row_path) {
            Some(node) => &node.records,
            None => return Ok(Vec::new()),
        }
    };

    Ok(candidates
        .iter()
        .copied()
        .filter(|&i| {
            columns
                .handles()
                .iter()
                .zip(col_path)
                .all(|(&h, expected)| accessor.extract(h, &records[i]) == *expected)
        })
        .collect())
}

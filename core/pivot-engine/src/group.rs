//! FILENAME: core/pivot-engine/src/group.rs
//! Row grouping - the recursive partition behind the row axis.
//!
//! At depth `d` the current record subset is partitioned by the value of
//! the `d`-th row field, keeping the first-seen order of the group keys.
//! Each group is then partitioned again by the next row field, using only
//! its own records. There is no depth limit; recursion stops when the row
//! field list is exhausted.

use records::{FieldAccessor, FieldHandle, FieldValue};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::{FieldStage, PivotError, PivotResult};

/// One node of the row grouping tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowGroupNode {
    /// The row field value shared by every record in this group.
    pub key: FieldValue,

    /// Display label for `key`.
    pub label: String,

    /// Name of the row field grouped at this depth.
    pub field: String,

    /// Depth in the tree (0 = outermost row field).
    pub depth: usize,

    /// Indices into the source record slice, in source order.
    pub records: Vec<usize>,

    /// Groups for the next row field, empty at the deepest level.
    pub children: Vec<RowGroupNode>,
}

impl RowGroupNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Finds the descendant (or self) reached by following `path` from
    /// this node's children.
    pub fn descendant(&self, path: &[FieldValue]) -> Option<&RowGroupNode> {
        if path.is_empty() {
            return Some(self);
        }
        find_group(&self.children, path)
    }
}

/// Finds the node at the end of a key path through a grouping forest.
pub fn find_group<'a>(forest: &'a [RowGroupNode], path: &[FieldValue]) -> Option<&'a RowGroupNode> {
    let (first, rest) = path.split_first()?;
    let mut node = forest.iter().find(|n| n.key == *first)?;
    for key in rest {
        node = node.children.iter().find(|n| n.key == *key)?;
    }
    Some(node)
}

/// Groups every record of `records` by the named row fields.
pub fn group_records<R>(
    accessor: &FieldAccessor<R>,
    records: &[R],
    row_fields: &[String],
) -> PivotResult<Vec<RowGroupNode>> {
    let handles = row_fields
        .iter()
        .map(|name| {
            accessor
                .resolve(name)
                .map_err(|_| PivotError::field_not_found(FieldStage::Row, name))
        })
        .collect::<PivotResult<Vec<FieldHandle>>>()?;

    let subset: Vec<usize> = (0..records.len()).collect();
    Ok(group_subset(accessor, records, &subset, &handles))
}

/// Groups the records at `subset` (indices into `records`) by resolved
/// row fields.
pub fn group_subset<R>(
    accessor: &FieldAccessor<R>,
    records: &[R],
    subset: &[usize],
    row_fields: &[FieldHandle],
) -> Vec<RowGroupNode> {
    group_level(accessor, records, subset, row_fields, 0)
}

fn group_level<R>(
    accessor: &FieldAccessor<R>,
    records: &[R],
    subset: &[usize],
    row_fields: &[FieldHandle],
    depth: usize,
) -> Vec<RowGroupNode> {
    let Some((&handle, remaining)) = row_fields.split_first() else {
        return Vec::new();
    };

    let mut groups: Vec<(FieldValue, Vec<usize>)> = Vec::new();
    let mut index: FxHashMap<FieldValue, usize> = FxHashMap::default();

    for &i in subset {
        let key = accessor.extract(handle, &records[i]);
        match index.get(&key) {
            Some(&g) => groups[g].1.push(i),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![i]));
            }
        }
    }

    let field = accessor.name(handle).to_string();

    groups
        .into_iter()
        .map(|(key, members)| {
            let children = group_level(accessor, records, &members, remaining, depth + 1);
            RowGroupNode {
                label: key.label(),
                key,
                field: field.clone(),
                depth,
                records: members,
                children,
            }
        })
        .collect()
}

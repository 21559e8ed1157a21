//! FILENAME: core/pivot-engine/src/header.rs
//! Column header hierarchy.
//!
//! Derives up to three nested levels of column headers from the filtered
//! records. Every level keeps first-seen order and holds each value once:
//! - level 1: distinct values of the first column field
//! - level 2: for each level-1 value, distinct values of the second field
//!   among records carrying that level-1 value
//! - level 3: for each (level-1, level-2) pair, distinct values of the
//!   third field among records carrying that pair
//!
//! Nodes keep the typed value (used to match records back to a header path)
//! next to its display label.

use records::{FieldAccessor, FieldHandle, FieldValue};
use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;

use crate::definition::MAX_COLUMN_FIELDS;
use crate::error::{FieldStage, PivotError, PivotResult};

/// One path through the column hierarchy, outermost value first.
pub type HeaderPath = SmallVec<[FieldValue; MAX_COLUMN_FIELDS]>;

// ============================================================================
// COLUMN FIELDS
// ============================================================================

/// The configured column dimensions, resolved against an accessor table.
#[derive(Debug, Clone, Default)]
pub struct ColumnFields {
    names: SmallVec<[String; MAX_COLUMN_FIELDS]>,
    handles: SmallVec<[FieldHandle; MAX_COLUMN_FIELDS]>,
}

impl ColumnFields {
    /// Resolves up to three column field names.
    pub fn resolve<R>(names: &[String], accessor: &FieldAccessor<R>) -> PivotResult<Self> {
        if names.len() > MAX_COLUMN_FIELDS {
            return Err(PivotError::TooManyColumnFields {
                count: names.len(),
                max: MAX_COLUMN_FIELDS,
            });
        }

        let mut fields = ColumnFields::default();
        for name in names {
            let handle = accessor
                .resolve(name)
                .map_err(|_| PivotError::field_not_found(FieldStage::Column, name))?;
            fields.names.push(name.clone());
            fields.handles.push(handle);
        }
        Ok(fields)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn handles(&self) -> &[FieldHandle] {
        &self.handles
    }

    /// Name of the field at a column level (0-based).
    pub fn field_at(&self, level: usize) -> PivotResult<&str> {
        self.names
            .get(level)
            .map(|n| n.as_str())
            .ok_or(PivotError::FieldNotConfigured {
                level,
                configured: self.len(),
            })
    }

    /// Reads a record's value for a column level. Unconfigured levels fail
    /// before the accessor is consulted.
    pub fn value_at<R>(
        &self,
        accessor: &FieldAccessor<R>,
        record: &R,
        level: usize,
    ) -> PivotResult<FieldValue> {
        let handle = self.handles.get(level).copied().ok_or(PivotError::FieldNotConfigured {
            level,
            configured: self.len(),
        })?;
        Ok(accessor.extract(handle, record))
    }

    /// The full header path of a record.
    pub fn path_of<R>(&self, accessor: &FieldAccessor<R>, record: &R) -> HeaderPath {
        self.handles
            .iter()
            .map(|&h| accessor.extract(h, record))
            .collect()
    }
}

// ============================================================================
// HIERARCHY
// ============================================================================

/// One header value and the values nested under it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderNode {
    pub value: FieldValue,
    pub label: String,
    pub children: Vec<HeaderNode>,
}

/// A header cell as a renderer draws it: one label spanning `leaf_count`
/// leaf columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderSpan {
    pub label: String,
    pub path: HeaderPath,
    pub leaf_count: usize,
}

/// Ordered, deduplicated column headers for up to three levels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderHierarchy {
    fields: Vec<String>,
    roots: Vec<HeaderNode>,
}

/// Insertion-ordered node used while scanning records.
#[derive(Default)]
struct NodeBuilder {
    entries: Vec<(FieldValue, NodeBuilder)>,
    index: FxHashMap<FieldValue, usize>,
}

impl NodeBuilder {
    fn child(&mut self, value: FieldValue) -> &mut NodeBuilder {
        let i = match self.index.get(&value) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.index.insert(value.clone(), i);
                self.entries.push((value, NodeBuilder::default()));
                i
            }
        };
        &mut self.entries[i].1
    }

    fn finish(self) -> Vec<HeaderNode> {
        self.entries
            .into_iter()
            .map(|(value, children)| HeaderNode {
                label: value.label(),
                value,
                children: children.finish(),
            })
            .collect()
    }
}

impl HeaderHierarchy {
    /// Scans the records once, inserting each record's header path.
    pub fn build<'r, R, I>(accessor: &FieldAccessor<R>, records: I, columns: &ColumnFields) -> Self
    where
        R: 'r,
        I: IntoIterator<Item = &'r R>,
    {
        let mut root = NodeBuilder::default();

        if !columns.is_empty() {
            for record in records {
                let mut node = &mut root;
                for &handle in columns.handles() {
                    node = node.child(accessor.extract(handle, record));
                }
            }
        }

        HeaderHierarchy {
            fields: columns.names().to_vec(),
            roots: root.finish(),
        }
    }

    /// Number of configured column levels (0 to 3).
    pub fn depth(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Level-1 nodes.
    pub fn level1(&self) -> &[HeaderNode] {
        &self.roots
    }

    /// Level-2 nodes under a level-1 value. Empty when absent.
    pub fn level2(&self, first: &FieldValue) -> &[HeaderNode] {
        self.children(std::slice::from_ref(first))
    }

    /// Level-3 nodes under a (level-1, level-2) pair. Empty when absent.
    pub fn level3(&self, first: &FieldValue, second: &FieldValue) -> &[HeaderNode] {
        self.children(&[first.clone(), second.clone()])
    }

    /// The node at the end of a non-empty prefix.
    pub fn node(&self, prefix: &[FieldValue]) -> Option<&HeaderNode> {
        let (first, rest) = prefix.split_first()?;
        let mut node = self.roots.iter().find(|n| n.value == *first)?;
        for value in rest {
            node = node.children.iter().find(|n| n.value == *value)?;
        }
        Some(node)
    }

    /// Nodes directly under a prefix; the empty prefix yields level 1.
    pub fn children(&self, prefix: &[FieldValue]) -> &[HeaderNode] {
        if prefix.is_empty() {
            return &self.roots;
        }
        self.node(prefix).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Every full-depth header path, in hierarchy order. With no column
    /// fields there is exactly one leaf: the empty path.
    pub fn leaf_paths(&self) -> Vec<HeaderPath> {
        let mut paths = Vec::new();
        if self.depth() == 0 {
            paths.push(HeaderPath::new());
            return paths;
        }
        let mut current = HeaderPath::new();
        collect_leaves(&self.roots, &mut current, &mut paths);
        paths
    }

    /// Number of leaf columns under a prefix. Unknown prefixes have none.
    pub fn leaf_count(&self, prefix: &[FieldValue]) -> usize {
        if prefix.len() > self.depth() {
            return 0;
        }
        if self.depth() == 0 {
            return 1;
        }
        if prefix.is_empty() {
            return self.roots.iter().map(count_leaves).sum();
        }
        self.node(prefix).map(count_leaves).unwrap_or(0)
    }

    /// One row of spans per configured level, in drawing order.
    pub fn header_rows(&self) -> Vec<Vec<HeaderSpan>> {
        let mut rows = vec![Vec::new(); self.depth()];
        let mut current = HeaderPath::new();
        collect_spans(&self.roots, &mut current, &mut rows);
        rows
    }
}

/// Number of leaf columns under a header prefix.
pub fn leaf_count(hierarchy: &HeaderHierarchy, prefix: &[FieldValue]) -> usize {
    hierarchy.leaf_count(prefix)
}

fn count_leaves(node: &HeaderNode) -> usize {
    if node.children.is_empty() {
        1
    } else {
        node.children.iter().map(count_leaves).sum()
    }
}

fn collect_leaves(nodes: &[HeaderNode], current: &mut HeaderPath, out: &mut Vec<HeaderPath>) {
    for node in nodes {
        current.push(node.value.clone());
        if node.children.is_empty() {
            out.push(current.clone());
        } else {
            collect_leaves(&node.children, current, out);
        }
        current.pop();
    }
}

fn collect_spans(nodes: &[HeaderNode], current: &mut HeaderPath, rows: &mut [Vec<HeaderSpan>]) {
    for node in nodes {
        current.push(node.value.clone());
        rows[current.len() - 1].push(HeaderSpan {
            label: node.label.clone(),
            path: current.clone(),
            leaf_count: count_leaves(node),
        });
        collect_spans(&node.children, current, rows);
        current.pop();
    }
}

//! FILENAME: core/pivot-engine/src/lib.rs
//! Pivot Table calculation engine.
//!
//! Groups a flat record collection by up to three nested column fields and
//! any number of nested row fields, and sums a numeric measure at every
//! (row group, column path) intersection. Fields are referenced by name and
//! resolved through a `records::FieldAccessor`.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the pivot table IS)
//! - `filter`, `header`, `group`, `aggregate`: the calculation stages
//! - `view`: Renderable output (WHAT we display)
//! - `engine`: Orchestration (HOW the stages fit together)

pub mod aggregate;
pub mod definition;
pub mod engine;
pub mod error;
pub mod filter;
pub mod group;
pub mod header;
pub mod view;

pub use aggregate::{sum, AggregateAccumulator};
pub use definition::*;
pub use engine::{build_pivot, drill_down, PivotTableBuilder};
pub use error::{FieldStage, PivotError, PivotResult};
pub use filter::{passes, value_matches, RecordFilter};
pub use group::{find_group, group_records, group_subset, RowGroupNode};
pub use header::{leaf_count, ColumnFields, HeaderHierarchy, HeaderNode, HeaderPath, HeaderSpan};
pub use view::*;

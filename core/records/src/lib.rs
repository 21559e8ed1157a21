//! FILENAME: core/records/src/lib.rs
//! PURPOSE: Record model shared by the pivot engine and its callers.
//! CONTEXT: Re-exports the typed field value, the field accessor table,
//! and the record sources (JSON-backed dynamic records and the sample
//! sales dataset).

pub mod accessor;
pub mod dynamic;
pub mod error;
pub mod sample;
pub mod value;

// Re-export commonly used types at the crate root
pub use accessor::{FieldAccessor, FieldAccessorBuilder, FieldHandle};
pub use dynamic::{DynamicDataset, DynamicRecord};
pub use error::{RecordError, RecordResult};
pub use sample::{sales_accessor, sample_sales, SalesRecord};
pub use value::{FieldKind, FieldValue};

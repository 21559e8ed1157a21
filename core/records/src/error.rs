//! FILENAME: core/records/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Field not found: '{field}' is not declared on the record schema")]
    FieldNotFound { field: String },

    #[error("Invalid record data: {0}")]
    InvalidData(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RecordError {
    pub(crate) fn field_not_found(field: &str) -> Self {
        RecordError::FieldNotFound {
            field: field.to_string(),
        }
    }
}

pub type RecordResult<T> = Result<T, RecordError>;

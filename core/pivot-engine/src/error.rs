//! FILENAME: core/pivot-engine/src/error.rs

use std::fmt;

use records::FieldKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The part of a pivot definition that referenced a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldStage {
    Filter,
    Column,
    Row,
    Measure,
}

impl fmt::Display for FieldStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldStage::Filter => "filter",
            FieldStage::Column => "column",
            FieldStage::Row => "row",
            FieldStage::Measure => "measure",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum PivotError {
    #[error("Field not found: {stage} field '{field}' is not declared on the record schema")]
    FieldNotFound { stage: FieldStage, field: String },

    #[error("Too many column fields: {count} configured, at most {max} supported")]
    TooManyColumnFields { count: usize, max: usize },

    #[error("Measure field '{field}' is {kind}, expected an integer or real field")]
    NonNumericMeasure { field: String, kind: FieldKind },

    #[error("Field not configured: column level {level} requested but only {configured} column fields are configured")]
    FieldNotConfigured { level: usize, configured: usize },

    #[error("Invalid pivot definition: {0}")]
    Definition(#[from] serde_json::Error),
}

impl PivotError {
    pub(crate) fn field_not_found(stage: FieldStage, field: &str) -> Self {
        PivotError::FieldNotFound {
            stage,
            field: field.to_string(),
        }
    }
}

pub type PivotResult<T> = Result<T, PivotError>;

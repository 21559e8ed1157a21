//! FILENAME: core/records/src/value.rs
//! PURPOSE: The typed value held by one field of a record.
//! CONTEXT: Every field is text, an integer, or a real number. Values keep
//! their original type for equality (so `Integer(10)` never equals
//! `Real(10.0)`), while the coercion helpers below give filters and
//! aggregations one uniform way to compare or sum across types.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// The declared type of a field on a record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Integer,
    Real,
}

impl FieldKind {
    /// True for the kinds that can be aggregated.
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Real)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Real => "real",
        };
        f.write_str(name)
    }
}

/// A single field value.
///
/// Serialized untagged, so `"Electronics"`, `18` and `2500.0` are all valid
/// JSON spellings of a value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    /// The kind this value was produced as.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::Real(_) => FieldKind::Real,
        }
    }

    /// Textual representation used for header and row labels.
    /// Reals carry a fractional part (`2500.0`) below 1e16 in magnitude,
    /// integers never do.
    pub fn label(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Real(n) => format!("{:?}", n),
        }
    }

    /// Borrows the text of a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Integer reading of this value, parsed from its textual form.
    /// A real's label always has a fractional part or exponent (`"18.0"`),
    /// so reals never coerce.
    pub fn coerce_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            FieldValue::Text(s) => s.parse().ok(),
            FieldValue::Real(_) => None,
        }
    }

    /// Real-number reading of this value, parsed from its textual form.
    pub fn coerce_real(&self) -> Option<f64> {
        match self {
            FieldValue::Real(n) => Some(*n),
            FieldValue::Integer(n) => Some(*n as f64),
            FieldValue::Text(s) => s.parse().ok(),
        }
    }

    /// Numeric value for aggregation. Text never contributes.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(n) => Some(*n as f64),
            FieldValue::Real(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a == b,
            // NaN values are treated as equal to each other.
            (FieldValue::Real(a), FieldValue::Real(b)) => {
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            _ => false,
        }
    }
}

impl Eq for FieldValue {}

impl Hash for FieldValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FieldValue::Text(s) => s.hash(state),
            FieldValue::Integer(n) => n.hash(state),
            FieldValue::Real(n) => {
                if n.is_nan() {
                    u64::MAX.hash(state);
                } else if *n == 0.0 {
                    // 0.0 and -0.0 compare equal, so they must hash equal
                    0u64.hash(state);
                } else {
                    n.to_bits().hash(state);
                }
            }
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Real(value)
    }
}

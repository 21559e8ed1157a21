//! FILENAME: core/records/src/dynamic.rs
//! PURPOSE: Records whose schema is only known at runtime.
//! CONTEXT: Loads a JSON array of objects into positional records and
//! derives the field accessor table from the data itself. Each column gets
//! one kind for the whole dataset: Integer when every value is integral,
//! Real as soon as one value is fractional (integers in that column are
//! widened), Text when every value is a string.

use serde::Serialize;
use serde_json::Value;

use crate::accessor::FieldAccessor;
use crate::error::{RecordError, RecordResult};
use crate::value::{FieldKind, FieldValue};

/// One record of a [`DynamicDataset`], values in schema order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicRecord {
    values: Vec<FieldValue>,
}

impl DynamicRecord {
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&FieldValue> {
        self.values.get(index)
    }
}

/// A schema plus the records loaded against it.
#[derive(Debug, Clone)]
pub struct DynamicDataset {
    fields: Vec<(String, FieldKind)>,
    records: Vec<DynamicRecord>,
}

impl DynamicDataset {
    /// Parses a JSON array of objects.
    pub fn from_json_str(input: &str) -> RecordResult<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_json(&value)
    }

    /// Builds a dataset from a JSON array of objects.
    pub fn from_json(value: &Value) -> RecordResult<Self> {
        let array = value.as_array().ok_or_else(|| {
            RecordError::InvalidData("input data must be a JSON array of objects".to_string())
        })?;

        if array.is_empty() {
            return Err(RecordError::InvalidData("input data array is empty".to_string()));
        }

        let mut objects = Vec::with_capacity(array.len());
        for (i, item) in array.iter().enumerate() {
            let obj = item.as_object().ok_or_else(|| {
                RecordError::InvalidData(format!("item {} is not an object", i))
            })?;
            objects.push(obj);
        }

        // Union of keys in first-seen order
        let mut names: Vec<String> = Vec::new();
        for obj in &objects {
            for key in obj.keys() {
                if !names.iter().any(|n| n == key) {
                    names.push(key.clone());
                }
            }
        }

        let mut fields = Vec::with_capacity(names.len());
        for name in names {
            let kind = infer_kind(&name, &objects)?;
            fields.push((name, kind));
        }

        let mut records = Vec::with_capacity(objects.len());
        for (i, obj) in objects.iter().enumerate() {
            let mut values = Vec::with_capacity(fields.len());
            for (name, kind) in &fields {
                let raw = obj.get(name).ok_or_else(|| {
                    RecordError::InvalidData(format!("item {} is missing field '{}'", i, name))
                })?;
                values.push(convert(raw, *kind, name, i)?);
            }
            records.push(DynamicRecord { values });
        }

        log::debug!(
            target: "records",
            "loaded {} dynamic records with {} fields",
            records.len(),
            fields.len()
        );

        Ok(DynamicDataset { fields, records })
    }

    pub fn records(&self) -> &[DynamicRecord] {
        &self.records
    }

    /// Field names and kinds in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldKind)> {
        self.fields.iter().map(|(n, k)| (n.as_str(), *k))
    }

    /// Accessor table over this dataset's records.
    pub fn accessor(&self) -> FieldAccessor<DynamicRecord> {
        let mut builder = FieldAccessor::builder();
        for (i, (name, kind)) in self.fields.iter().enumerate() {
            builder = builder.field(name, *kind, move |r: &DynamicRecord| r.values[i].clone());
        }
        builder.build()
    }
}

fn infer_kind(name: &str, objects: &[&serde_json::Map<String, Value>]) -> RecordResult<FieldKind> {
    let mut kind: Option<FieldKind> = None;

    for (i, obj) in objects.iter().enumerate() {
        let seen = match obj.get(name) {
            Some(Value::String(_)) => FieldKind::Text,
            Some(Value::Number(n)) if n.is_i64() => FieldKind::Integer,
            Some(Value::Number(_)) => FieldKind::Real,
            Some(other) => {
                return Err(RecordError::InvalidData(format!(
                    "unsupported value {} for field '{}' in item {}",
                    other, name, i
                )))
            }
            None => {
                return Err(RecordError::InvalidData(format!(
                    "item {} is missing field '{}'",
                    i, name
                )))
            }
        };

        kind = Some(match (kind, seen) {
            (None, k) => k,
            (Some(a), b) if a == b => a,
            (Some(FieldKind::Integer), FieldKind::Real) | (Some(FieldKind::Real), FieldKind::Integer) => {
                FieldKind::Real
            }
            (Some(a), b) => {
                return Err(RecordError::InvalidData(format!(
                    "field '{}' mixes {} and {} values (item {})",
                    name, a, b, i
                )))
            }
        });
    }

    kind.ok_or_else(|| RecordError::InvalidData(format!("field '{}' has no values", name)))
}

fn convert(raw: &Value, kind: FieldKind, name: &str, index: usize) -> RecordResult<FieldValue> {
    let value = match (kind, raw) {
        (FieldKind::Text, Value::String(s)) => Some(FieldValue::Text(s.clone())),
        (FieldKind::Integer, Value::Number(n)) => n.as_i64().map(FieldValue::Integer),
        (FieldKind::Real, Value::Number(n)) => n.as_f64().map(FieldValue::Real),
        _ => None,
    };

    value.ok_or_else(|| {
        RecordError::InvalidData(format!(
            "value {} for field '{}' in item {} is not {}",
            raw, name, index, kind
        ))
    })
}

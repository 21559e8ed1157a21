//! FILENAME: core/records/src/accessor.rs
//! PURPOSE: Resolves named fields on a record to typed values.
//! CONTEXT: An accessor table is built once per record schema: every
//! declared field name maps to its kind and an extraction function. Name
//! lookup happens in exactly one place (`resolve`), so an undeclared name
//! fails there with `RecordError::FieldNotFound` and every later read through
//! the returned handle is infallible.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::{RecordError, RecordResult};
use crate::value::{FieldKind, FieldValue};

type Extractor<R> = Box<dyn Fn(&R) -> FieldValue + Send + Sync>;

/// A resolved reference to one field of an accessor table.
/// Only meaningful for the accessor that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FieldHandle(usize);

impl FieldHandle {
    /// Position of the field in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

struct FieldDef<R> {
    name: String,
    kind: FieldKind,
    extract: Extractor<R>,
}

/// Accessor table for records of type `R`.
pub struct FieldAccessor<R> {
    fields: Vec<FieldDef<R>>,
    index: FxHashMap<String, usize>,
}

impl<R> FieldAccessor<R> {
    pub fn builder() -> FieldAccessorBuilder<R> {
        FieldAccessorBuilder {
            accessor: FieldAccessor {
                fields: Vec::new(),
                index: FxHashMap::default(),
            },
        }
    }

    /// Looks up a field by name.
    pub fn resolve(&self, name: &str) -> RecordResult<FieldHandle> {
        self.index
            .get(name)
            .map(|&i| FieldHandle(i))
            .ok_or_else(|| RecordError::field_not_found(name))
    }

    /// Reads a resolved field from a record.
    pub fn extract(&self, handle: FieldHandle, record: &R) -> FieldValue {
        (self.fields[handle.0].extract)(record)
    }

    /// Reads a field by name.
    pub fn get(&self, record: &R, name: &str) -> RecordResult<FieldValue> {
        let handle = self.resolve(name)?;
        Ok(self.extract(handle, record))
    }

    pub fn kind(&self, handle: FieldHandle) -> FieldKind {
        self.fields[handle.0].kind
    }

    pub fn name(&self, handle: FieldHandle) -> &str {
        &self.fields[handle.0].name
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Declared field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<R> fmt::Debug for FieldAccessor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.fields.iter().map(|d| (&d.name, d.kind)))
            .finish()
    }
}

/// Builder for [`FieldAccessor`].
pub struct FieldAccessorBuilder<R> {
    accessor: FieldAccessor<R>,
}

impl<R> FieldAccessorBuilder<R> {
    /// Declares a field with an explicit kind.
    /// Re-declaring a name replaces its extractor but keeps its position.
    pub fn field<F>(mut self, name: &str, kind: FieldKind, extract: F) -> Self
    where
        F: Fn(&R) -> FieldValue + Send + Sync + 'static,
    {
        let def = FieldDef {
            name: name.to_string(),
            kind,
            extract: Box::new(extract),
        };

        match self.accessor.index.get(name) {
            Some(&i) => self.accessor.fields[i] = def,
            None => {
                self.accessor
                    .index
                    .insert(name.to_string(), self.accessor.fields.len());
                self.accessor.fields.push(def);
            }
        }
        self
    }

    pub fn text<F>(self, name: &str, extract: F) -> Self
    where
        F: Fn(&R) -> &str + Send + Sync + 'static,
    {
        self.field(name, FieldKind::Text, move |r| {
            FieldValue::Text(extract(r).to_string())
        })
    }

    pub fn integer<F>(self, name: &str, extract: F) -> Self
    where
        F: Fn(&R) -> i64 + Send + Sync + 'static,
    {
        self.field(name, FieldKind::Integer, move |r| {
            FieldValue::Integer(extract(r))
        })
    }

    pub fn real<F>(self, name: &str, extract: F) -> Self
    where
        F: Fn(&R) -> f64 + Send + Sync + 'static,
    {
        self.field(name, FieldKind::Real, move |r| FieldValue::Real(extract(r)))
    }

    pub fn build(self) -> FieldAccessor<R> {
        self.accessor
    }
}

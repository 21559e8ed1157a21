//! FILENAME: tests/common/mod.rs
//! Fixtures shared by the pivot engine integration tests.

#![allow(dead_code)]

use records::{sales_accessor, sample_sales, FieldAccessor, FieldValue, SalesRecord};

/// A small product line used for the three-record scenarios.
#[derive(Debug, Clone)]
pub struct Line {
    pub name: String,
    pub category: String,
    pub qty: i64,
    pub quality: String,
    pub amount: f64,
}

pub struct LineFixture;

impl LineFixture {
    pub fn data() -> Vec<Line> {
        vec![
            Self::line("A", "cat1", 10, "x", 5.0),
            Self::line("B", "cat1", 20, "y", 5.0),
            Self::line("C", "cat2", 10, "x", 5.0),
        ]
    }

    pub fn accessor() -> FieldAccessor<Line> {
        FieldAccessor::builder()
            .text("name", |l: &Line| l.name.as_str())
            .text("category", |l: &Line| l.category.as_str())
            .integer("qty", |l: &Line| l.qty)
            .text("quality", |l: &Line| l.quality.as_str())
            .real("amount", |l: &Line| l.amount)
            .build()
    }

    /// The same three lines as a JSON array of objects.
    pub fn json() -> &'static str {
        r#"[
            {"name": "A", "category": "cat1", "qty": 10, "quality": "x", "amount": 5.0},
            {"name": "B", "category": "cat1", "qty": 20, "quality": "y", "amount": 5.0},
            {"name": "C", "category": "cat2", "qty": 10, "quality": "x", "amount": 5.0}
        ]"#
    }

    fn line(name: &str, category: &str, qty: i64, quality: &str, amount: f64) -> Line {
        Line {
            name: name.to_string(),
            category: category.to_string(),
            qty,
            quality: quality.to_string(),
            amount,
        }
    }
}

/// The seven-line sales demo dataset.
pub struct SalesFixture;

impl SalesFixture {
    pub fn data() -> Vec<SalesRecord> {
        sample_sales()
    }

    pub fn accessor() -> FieldAccessor<SalesRecord> {
        sales_accessor()
    }

    /// Column fields of the demo configuration.
    pub fn columns() -> [&'static str; 3] {
        ["category", "productName", "quality"]
    }

    /// Row fields of the demo configuration.
    pub fn rows() -> [&'static str; 3] {
        ["classification", "tax", "salesQuantity"]
    }
}

pub fn text(s: &str) -> FieldValue {
    FieldValue::text(s)
}

//! FILENAME: core/records/src/sample.rs
//! PURPOSE: The sales dataset used by demos, tests and benchmarks.

use serde::{Deserialize, Serialize};

use crate::accessor::FieldAccessor;

/// One sales line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub product_name: String,
    pub category: String,
    pub sales_quantity: i64,
    pub sales_amount: f64,
    pub quality: String,
    pub tax: i64,
    pub classification: String,
}

impl SalesRecord {
    pub fn new(
        product_name: &str,
        category: &str,
        sales_quantity: i64,
        sales_amount: f64,
        quality: &str,
        tax: i64,
        classification: &str,
    ) -> Self {
        SalesRecord {
            product_name: product_name.to_string(),
            category: category.to_string(),
            sales_quantity,
            sales_amount,
            quality: quality.to_string(),
            tax,
            classification: classification.to_string(),
        }
    }
}

/// Accessor table for [`SalesRecord`], using the camelCase field names.
pub fn sales_accessor() -> FieldAccessor<SalesRecord> {
    FieldAccessor::builder()
        .text("productName", |r: &SalesRecord| r.product_name.as_str())
        .text("category", |r: &SalesRecord| r.category.as_str())
        .integer("salesQuantity", |r: &SalesRecord| r.sales_quantity)
        .real("salesAmount", |r: &SalesRecord| r.sales_amount)
        .text("quality", |r: &SalesRecord| r.quality.as_str())
        .integer("tax", |r: &SalesRecord| r.tax)
        .text("classification", |r: &SalesRecord| r.classification.as_str())
        .build()
}

/// The seven demo sales lines.
pub fn sample_sales() -> Vec<SalesRecord> {
    vec![
        SalesRecord::new("Product A", "Electronics", 100, 2500.0, "A", 18, "class1"),
        SalesRecord::new("Product B", "Electronics", 150, 3750.0, "B", 8, "class2"),
        SalesRecord::new("Product C", "Furniture", 80, 2400.0, "C", 18, "class2"),
        SalesRecord::new("Product D", "Furniture", 60, 1800.0, "A", 8, "class3"),
        SalesRecord::new("Product E", "Clothing", 200, 5000.0, "B", 10, "class1"),
        SalesRecord::new("Product F", "Clothing", 100, 3000.0, "C", 5, "class3"),
        SalesRecord::new("Product Z", "Furniture", 70, 1700.0, "A", 10, "class1"),
    ]
}

//! FILENAME: tests/test_pivot.rs
//! Integration tests for pivot table construction.

mod common;

use common::{text, LineFixture, SalesFixture};
use pivot_engine::{
    build_pivot, drill_down, group_records, passes, BackgroundStyle, FieldStage, FilterSpec,
    ColumnFields, HeaderHierarchy, PivotDefinition, PivotError, PivotTableBuilder,
};
use records::{DynamicDataset, FieldValue};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn line_definition() -> PivotDefinition {
    PivotDefinition::new("amount")
        .with_columns(&["category"])
        .with_rows(&["quality"])
}

fn labels<'a>(values: impl IntoIterator<Item = &'a String>) -> Vec<&'a str> {
    values.into_iter().map(|s| s.as_str()).collect()
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_three_line_scenario() {
    let accessor = LineFixture::accessor();
    let data = LineFixture::data();
    let table = build_pivot(&data, &accessor, &line_definition()).unwrap();

    let level1 = labels(table.hierarchy().level1().iter().map(|n| &n.label));
    assert_eq!(level1, vec!["cat1", "cat2"]);

    let top = labels(table.row_groups().iter().map(|n| &n.label));
    assert_eq!(top, vec!["x", "y"]);

    let x_cat1 = table.cell(&[text("x")], &[text("cat1")]).unwrap();
    assert_eq!(x_cat1.total, 5.0);
    assert_eq!(x_cat1.display, "5.0");

    let y_cat2 = table.cell(&[text("y")], &[text("cat2")]).unwrap();
    assert_eq!(y_cat2.total, 0.0);
    assert_eq!(y_cat2.display, "-");
}

#[test]
fn test_dynamic_records_match_static_records() {
    let dataset = DynamicDataset::from_json_str(LineFixture::json()).unwrap();
    let accessor = dataset.accessor();
    let dynamic = build_pivot(dataset.records(), &accessor, &line_definition()).unwrap();

    let static_accessor = LineFixture::accessor();
    let static_data = LineFixture::data();
    let expected = build_pivot(&static_data, &static_accessor, &line_definition()).unwrap();

    assert_eq!(dynamic.rows(), expected.rows());
    assert_eq!(dynamic.hierarchy(), expected.hierarchy());
}

#[test]
fn test_empty_row_fields() {
    let accessor = LineFixture::accessor();
    let def = PivotDefinition::new("amount").with_columns(&["category"]);
    let table = build_pivot(&LineFixture::data(), &accessor, &def).unwrap();

    assert!(table.row_groups().is_empty());
    assert!(table.rows().is_empty());
    assert_eq!(table.stats().filtered_records, 3);
    assert!(group_records(&accessor, &LineFixture::data(), &[]).unwrap().is_empty());
}

#[test]
fn test_unconfigured_column_level() {
    let accessor = LineFixture::accessor();
    let columns = ColumnFields::resolve(&["category".to_string()], &accessor).unwrap();
    let record = &LineFixture::data()[0];

    assert_eq!(columns.field_at(0).unwrap(), "category");
    assert!(matches!(
        columns.field_at(1),
        Err(PivotError::FieldNotConfigured { level: 1, configured: 1 })
    ));

    match columns.value_at(&accessor, record, 1) {
        Err(PivotError::FieldNotConfigured { level, configured }) => {
            assert_eq!(level, 1);
            assert_eq!(configured, 1);
        }
        other => panic!("expected FieldNotConfigured, got {:?}", other),
    }
}

#[test]
fn test_empty_filter_admits_every_record() {
    let accessor = SalesFixture::accessor();
    for record in SalesFixture::data() {
        assert!(passes(&accessor, &record, &FilterSpec::new()).unwrap());
    }
}

#[test]
fn test_filter_is_and_of_ors() {
    let accessor = SalesFixture::accessor();
    let spec = FilterSpec::new()
        .allow("tax", [18, 10])
        .allow("quality", ["A", "B"]);

    for record in SalesFixture::data() {
        let expected = (record.tax == 18 || record.tax == 10)
            && (record.quality == "A" || record.quality == "B");
        assert_eq!(
            passes(&accessor, &record, &spec).unwrap(),
            expected,
            "{}",
            record.product_name
        );
    }
}

#[test]
fn test_hierarchy_order_is_first_seen_for_any_input_order() {
    let accessor = SalesFixture::accessor();
    let columns = ColumnFields::resolve(&["classification".to_string()], &accessor).unwrap();
    let base = SalesFixture::data();

    for shift in 0..base.len() {
        let mut data = base.clone();
        data.rotate_left(shift);
        let hierarchy = HeaderHierarchy::build(&accessor, &data, &columns);

        let mut expected: Vec<String> = Vec::new();
        for record in &data {
            if !expected.contains(&record.classification) {
                expected.push(record.classification.clone());
            }
        }
        let actual: Vec<String> = hierarchy.level1().iter().map(|n| n.label.clone()).collect();
        assert_eq!(actual, expected);
    }
}

#[test]
fn test_rebuild_is_deterministic() {
    let accessor = SalesFixture::accessor();
    let data = SalesFixture::data();
    let def = PivotDefinition::new("salesAmount")
        .with_columns(&SalesFixture::columns())
        .with_rows(&SalesFixture::rows());

    let first = build_pivot(&data, &accessor, &def).unwrap();
    let second = build_pivot(&data, &accessor, &def).unwrap();
    assert_eq!(first, second);

    let builder = PivotTableBuilder::new(&accessor, def).unwrap();
    assert_eq!(builder.build(&data), first);
}

#[test]
fn test_demo_configuration_with_filter() {
    let accessor = SalesFixture::accessor();
    let data = SalesFixture::data();
    let def = PivotDefinition::new("salesAmount")
        .with_columns(&SalesFixture::columns())
        .with_rows(&SalesFixture::rows())
        .with_filter(
            FilterSpec::new()
                .allow("productName", ["Product A", "Product C"])
                .allow("salesAmount", [2500.0, 2400.0])
                .allow("tax", [18, 8])
                .allow("classification", ["class1", "class2"]),
        );
    let table = build_pivot(&data, &accessor, &def).unwrap();

    assert_eq!(table.filtered_records(), &[0, 2]);

    let path_a = [text("Electronics"), text("Product A"), text("A")];
    let path_c = [text("Furniture"), text("Product C"), text("C")];

    let class1 = table.cell(&[text("class1")], &path_a).unwrap();
    assert_eq!(class1.total, 2500.0);
    assert_eq!(class1.background, BackgroundStyle::OuterGroup);

    let leaf = table
        .cell(
            &[text("class2"), FieldValue::Integer(18), FieldValue::Integer(80)],
            &path_c,
        )
        .unwrap();
    assert_eq!(leaf.total, 2400.0);
    assert_eq!(leaf.background, BackgroundStyle::InnerGroup);

    let middle = table.row(&[text("class2"), FieldValue::Integer(18)]).unwrap();
    assert_eq!(middle.background, BackgroundStyle::Normal);
    assert_eq!(middle.cells[0].display, "-");
}

#[test]
fn test_header_rows_for_renderer() {
    let accessor = SalesFixture::accessor();
    let def = PivotDefinition::new("salesAmount")
        .with_columns(&["category", "quality"])
        .with_rows(&["classification"]);
    let table = build_pivot(&SalesFixture::data(), &accessor, &def).unwrap();

    let rows = table.header_rows();
    assert_eq!(rows.len(), 2);

    let widths: Vec<u64> = rows[0].iter().map(|s| table.column_width(&s.path)).collect();
    assert_eq!(widths, vec![240, 240, 240]);

    let leaf_labels: Vec<&str> = rows[1].iter().map(|s| s.label.as_str()).collect();
    assert_eq!(leaf_labels, vec!["A", "B", "C", "A", "B", "C"]);

    for row in table.rows() {
        assert_eq!(row.cells.len(), table.leaf_paths().len());
    }
}

#[test]
fn test_row_totals_add_up() {
    let accessor = SalesFixture::accessor();
    let def = PivotDefinition::new("salesQuantity")
        .with_columns(&["category"])
        .with_rows(&["classification", "quality"]);
    let table = build_pivot(&SalesFixture::data(), &accessor, &def).unwrap();

    for (i, row) in table.rows().iter().enumerate() {
        let children: Vec<_> = table
            .rows()
            .iter()
            .filter(|r| r.parent_index == Some(i))
            .collect();
        if children.is_empty() {
            continue;
        }
        for col in 0..row.cells.len() {
            let sum: f64 = children.iter().map(|c| c.cells[col].total).sum();
            assert_eq!(sum, row.cells[col].total);
        }
    }
}

#[test]
fn test_configuration_errors_name_stage() {
    let accessor = SalesFixture::accessor();
    let data = SalesFixture::data();

    let err = build_pivot(&data, &accessor, &PivotDefinition::new("salesAmount").with_rows(&["store"]))
        .unwrap_err();
    assert!(matches!(
        err,
        PivotError::FieldNotFound { stage: FieldStage::Row, .. }
    ));
    assert!(err.to_string().contains("store"));

    let err = build_pivot(
        &data,
        &accessor,
        &PivotDefinition::new("salesAmount").with_columns(&["a", "b", "c", "d"]),
    )
    .unwrap_err();
    assert!(matches!(err, PivotError::TooManyColumnFields { count: 4, .. }));
}

#[test]
fn test_definition_from_json_drives_build() {
    let accessor = SalesFixture::accessor();
    let data = SalesFixture::data();
    let def = PivotDefinition::from_json(
        r#"{
            "column_fields": ["category"],
            "row_fields": ["quality"],
            "measure_field": "salesAmount",
            "filter": [{"field": "tax", "allowed": ["18", 8]}],
            "layout": {"zero_placeholder": "0"}
        }"#,
    )
    .unwrap();
    let table = build_pivot(&data, &accessor, &def).unwrap();

    assert_eq!(table.stats().filtered_records, 4);
    assert_eq!(table.layout().leaf_width, 120);
    let cell = table.cell(&[text("C")], &[text("Electronics")]).unwrap();
    assert_eq!(cell.display, "0");
}

#[test]
fn test_drill_down_matches_cell_counts() {
    let accessor = SalesFixture::accessor();
    let data = SalesFixture::data();
    let def = PivotDefinition::new("salesAmount")
        .with_columns(&["category"])
        .with_rows(&["quality", "tax"]);
    let table = build_pivot(&data, &accessor, &def).unwrap();

    for row in table.rows() {
        for (col, leaf) in table.leaf_paths().iter().enumerate() {
            let indices = drill_down(&table, &accessor, &data, &row.path, leaf).unwrap();
            assert_eq!(indices.len() as u64, row.cells[col].record_count);
            let total: f64 = indices.iter().map(|&i| data[i].sales_amount).sum();
            assert_eq!(total, row.cells[col].total);
        }
    }
}

#[test]
fn test_table_serializes_for_frontend() {
    let accessor = LineFixture::accessor();
    let table = build_pivot(&LineFixture::data(), &accessor, &line_definition()).unwrap();
    let json = serde_json::to_value(&table).unwrap();

    assert_eq!(json["measure_field"], "amount");
    assert_eq!(json["rows"][0]["label"], "x");
    assert_eq!(json["rows"][0]["cells"][0]["background"], "OuterGroup");
    assert_eq!(json["rows"][1]["cells"][1]["display"], "-");
}

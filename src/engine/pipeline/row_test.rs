use crate::engine::pipeline::{DataField, DataType, FieldValue, Row, RowBatch};
use crate::test_helpers::factory::Factory;

#[test]
fn replace_keeps_position() {
    let mut row = Row::new(vec![FieldValue::from("a$b"), FieldValue::from(7i64)]);

    let old = row.replace(0, FieldValue::Bytes(vec![1, 2]));

    assert_eq!(old, Some(FieldValue::Text("a$b".into())));
    assert_eq!(row.get(0).and_then(FieldValue::as_bytes), Some(&[1u8, 2][..]));
    assert_eq!(row.get(1), Some(&FieldValue::Long(7)));
    assert_eq!(row.replace(5, FieldValue::Null), None);
    assert_eq!(row.len(), 2);
}

#[test]
fn batches_preserve_row_order() {
    let batch = Factory::row_batch().with_numbered_rows(0, 5).create();

    let values: Vec<FieldValue> = batch
        .into_iter()
        .flat_map(Row::into_values)
        .collect();

    assert_eq!(values, (0..5).map(FieldValue::Long).collect::<Vec<_>>());
}

#[test]
fn complex_fields_are_flagged() {
    let schema = Factory::generic_type().create_shared();

    assert!(DataField::new("c", DataType::Complex(schema)).is_complex());
    assert!(!DataField::new("n", DataType::Long).is_complex());
    assert!(RowBatch::new().is_empty());
}

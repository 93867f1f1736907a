use crate::engine::complex::GenericType;
use crate::engine::errors::StageExecutionError;
use crate::engine::pipeline::{BatchWriter, ColumnarWriter, DataField, DataType, FieldValue};
use crate::test_helpers::factory::Factory;
use std::sync::Arc;

fn ints(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

fn fields() -> Vec<DataField> {
    let schema = Factory::generic_type()
        .with_column("tags")
        .with_type("array<string>")
        .create_shared();
    vec![
        DataField::new("id", DataType::Long),
        DataField::new("tags", DataType::Complex(schema)),
    ]
}

#[test]
fn transposes_complex_fields_per_partition() {
    let writer = ColumnarWriter::new();
    let batch = Factory::row_batch()
        .with_row(vec![
            FieldValue::Long(1),
            FieldValue::Bytes([ints(&[2, 1]), vec![2, 3]].concat()),
        ])
        .with_row(vec![
            FieldValue::Long(2),
            FieldValue::Bytes([ints(&[1, 1]), vec![4]].concat()),
        ])
        .create();

    let second = writer.open_partition(1, &fields()).unwrap();
    second.close().unwrap();
    let mut first = writer.open_partition(0, &fields()).unwrap();
    first.write_batch(&batch).unwrap();
    first.close().unwrap();

    let outputs = writer.outputs();
    assert_eq!(outputs.len(), 2);
    assert_eq!((outputs[0].partition, outputs[0].rows), (0, 2));
    assert_eq!(outputs[1].rows, 0);

    let tags = outputs[0].complex_column("tags").unwrap();
    assert_eq!(tags.column(0), &[ints(&[2, 0]), ints(&[1, 2])]);
    assert_eq!(tags.column(1), &[vec![2u8], vec![3], vec![4]]);
    assert_eq!(
        outputs[0].primitive_column("id"),
        Some(&[FieldValue::Long(1), FieldValue::Long(2)][..])
    );
}

#[test]
fn unconverted_complex_value_is_rejected() {
    let writer = ColumnarWriter::new();
    let batch = Factory::row_batch()
        .with_row(vec![FieldValue::Long(1), FieldValue::from("a$b")])
        .create();

    let mut sink = writer.open_partition(3, &fields()).unwrap();
    let err = sink.write_batch(&batch).unwrap_err();

    assert!(matches!(err, StageExecutionError::Writer { partition: 3, .. }));
}

#[test]
fn row_width_must_match_fields() {
    let writer = ColumnarWriter::new();
    let batch = Factory::row_batch().with_numbered_rows(0, 1).create();

    let mut sink = writer.open_partition(0, &fields()).unwrap();

    assert!(matches!(
        sink.write_batch(&batch),
        Err(StageExecutionError::Writer { .. })
    ));
}

#[test]
fn unflattened_complex_schema_cannot_open() {
    let mut schema = GenericType::array("raw", "", "raw#0");
    schema
        .add_children(GenericType::primitive("raw.val", "raw", "raw#1", 0))
        .unwrap();
    let fields = vec![DataField::new("raw", DataType::Complex(Arc::new(schema)))];

    let result = ColumnarWriter::new().open_partition(2, &fields);

    assert!(matches!(
        result,
        Err(StageExecutionError::Writer { partition: 2, .. })
    ));
}

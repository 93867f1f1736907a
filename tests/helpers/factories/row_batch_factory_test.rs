use crate::engine::pipeline::FieldValue;
use crate::test_helpers::factory::Factory;

#[test]
fn test_row_batch_factory() {
    let batch = Factory::row_batch()
        .with_texts(&["a$b", "c"])
        .with_numbered_rows(10, 2)
        .create();

    assert_eq!(batch.len(), 4);
    assert_eq!(batch.rows()[0].get(0), Some(&FieldValue::Text("a$b".into())));
    assert_eq!(batch.rows()[3].get(0), Some(&FieldValue::Long(11)));
}

use crate::test_helpers::factory::Factory;

#[test]
fn test_generic_type_factory() {
    let schema = Factory::generic_type()
        .with_column("tags")
        .with_type("array<string>")
        .with_first_surrogate_index(3)
        .with_output_base(2)
        .create();

    assert_eq!(schema.name(), "tags");
    assert_eq!(schema.output_array_index(), 2);
    assert_eq!(schema.element().unwrap().surrogate_index(), Some(3));
    assert_eq!(schema.element().unwrap().output_array_index(), 3);
}

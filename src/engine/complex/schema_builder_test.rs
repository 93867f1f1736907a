use crate::engine::complex::{ComplexSchemaBuilder, TypeSpec, parse_type_spec};
use crate::engine::errors::SchemaConstructionError;

#[test]
fn parses_nested_types() {
    let spec = parse_type_spec("array<array<string>>").unwrap();
    assert_eq!(
        spec,
        TypeSpec::Array(Box::new(TypeSpec::Array(Box::new(TypeSpec::Primitive(
            "string".into()
        )))))
    );

    let spec = parse_type_spec(" ARRAY < Struct< a : INT , b:string > > ").unwrap();
    assert_eq!(
        spec,
        TypeSpec::Array(Box::new(TypeSpec::Struct(vec![
            ("a".into(), TypeSpec::Primitive("int".into())),
            ("b".into(), TypeSpec::Primitive("string".into())),
        ])))
    );
}

#[test]
fn rejects_unknown_or_malformed_types() {
    for input in ["array<blob>", "array<string", "struct<>", "map<string,string>", ""] {
        assert!(
            matches!(
                parse_type_spec(input),
                Err(SchemaConstructionError::InvalidTypeString(_))
            ),
            "input {:?}",
            input
        );
    }
}

#[test]
fn top_level_must_be_complex() {
    let err = ComplexSchemaBuilder::new("c").build("string").unwrap_err();
    assert!(matches!(err, SchemaConstructionError::InvalidTypeString(_)));
}

#[test]
fn names_ids_and_surrogate_indexes() {
    let schema = ComplexSchemaBuilder::new("orders")
        .with_first_surrogate_index(2)
        .build("array<struct<sku:string,qty:int>>")
        .unwrap();

    let item = schema.element().unwrap();
    assert_eq!(item.name(), "orders.val");
    assert_eq!(item.parent_name(), "orders");

    let leaves = schema.leaf_descendants();
    let described: Vec<(&str, &str, Option<usize>)> = leaves
        .iter()
        .map(|l| (l.name(), l.column_id(), l.surrogate_index()))
        .collect();
    assert_eq!(
        described,
        vec![
            ("orders.val.sku", "orders#2", Some(2)),
            ("orders.val.qty", "orders#3", Some(3)),
        ]
    );
    assert_eq!(schema.max_output_array_index(), 3);
}

#[test]
fn duplicate_struct_fields_fail_construction() {
    let err = ComplexSchemaBuilder::new("c")
        .build("struct<a:string,a:int>")
        .unwrap_err();

    assert!(matches!(err, SchemaConstructionError::DuplicateChild { .. }));
}

use crate::engine::complex::KeyGenerator;
use crate::engine::errors::CodecError;
use crate::test_helpers::factory::Factory;

fn ints(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

#[test]
fn array_levels_carry_leaf_width_once_per_occurrence() {
    let schema = Factory::generic_type().create();
    let encoded = ints(&[2, 2, 2, 3, 1, 4]);
    let generators = vec![KeyGenerator::with_key_size(1)];

    let mut input = encoded.as_slice();
    let mut out = Vec::new();
    schema
        .parse_and_bit_pack(&mut input, &generators, &mut out)
        .unwrap();

    let mut expected = ints(&[2, 2, 1]);
    expected.extend_from_slice(&[2, 3]);
    expected.extend(ints(&[1, 1]));
    expected.push(4);
    assert_eq!(out, expected);
    assert!(input.is_empty());
}

#[test]
fn struct_writes_width_before_each_primitive_field() {
    let schema = Factory::generic_type()
        .with_type("struct<a:string,b:array<string>>")
        .create();
    let encoded = ints(&[2, 5, 1, 7]);
    let generators = vec![KeyGenerator::with_key_size(1), KeyGenerator::with_key_size(2)];

    let mut input = encoded.as_slice();
    let mut out = Vec::new();
    schema
        .parse_and_bit_pack(&mut input, &generators, &mut out)
        .unwrap();

    let mut expected = ints(&[2, 1]);
    expected.push(5);
    expected.extend(ints(&[1, 2]));
    expected.extend_from_slice(&[0, 7]);
    assert_eq!(out, expected);
}

#[test]
fn missing_key_generator_is_reported() {
    let schema = Factory::generic_type()
        .with_type("array<string>")
        .with_first_surrogate_index(3)
        .create();
    let encoded = ints(&[1, 2]);

    let mut input = encoded.as_slice();
    let err = schema
        .parse_and_bit_pack(&mut input, &[KeyGenerator::default()], &mut Vec::new())
        .unwrap_err();

    assert!(matches!(
        err,
        CodecError::MissingKeyGenerator {
            surrogate_index: 3,
            ..
        }
    ));
}

#[test]
fn truncated_stream_is_unexpected_eof() {
    let schema = Factory::generic_type().create();
    let encoded = ints(&[2, 1, 2]);
    let generators = vec![KeyGenerator::with_key_size(1)];

    let mut input = encoded.as_slice();
    let err = schema
        .parse_and_bit_pack(&mut input, &generators, &mut Vec::new())
        .unwrap_err();

    assert!(matches!(err, CodecError::UnexpectedEof { needed: 4, remaining: 0, .. }));
}

#[test]
fn key_wider_than_layout_is_rejected() {
    let schema = Factory::generic_type().with_type("array<string>").create();
    let encoded = ints(&[1, 300]);
    let generators = vec![KeyGenerator::with_key_size(1)];

    let mut input = encoded.as_slice();
    let err = schema
        .parse_and_bit_pack(&mut input, &generators, &mut Vec::new())
        .unwrap_err();

    assert!(matches!(err, CodecError::KeyOverflow { key: 300, key_size: 1 }));
}

#[test]
fn leaf_key_width_delegates_through_arrays() {
    let generators = vec![KeyGenerator::with_key_size(3)];
    let array = Factory::generic_type().create();
    assert_eq!(array.leaf_key_width(&generators).unwrap(), Some(3));

    let structure = Factory::generic_type()
        .with_type("struct<a:string>")
        .create();
    assert_eq!(structure.leaf_key_width(&generators).unwrap(), None);
}

use crate::test_helpers::factory::Factory;

#[test]
fn test_codec_options_factory() {
    let options = Factory::codec_options()
        .with_delimiters(&["|", ";"])
        .with_null_member("<null>")
        .create();

    assert_eq!(options.delimiters(), &["|".to_string(), ";".to_string()]);
    assert_eq!(options.null_member(), "<null>");
}

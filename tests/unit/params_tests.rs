// Parameter assembly unit tests

use flyyer::params::{build_parameter_set, CacheBuster, ParameterAssembler};
use flyyer::query::encode_query;
use flyyer::{Meta, MetaField, ParameterMap, ParameterValue};

#[test]
fn test_meta_alias_resolution_both_directions() {
    let mut meta = Meta::new();
    meta.insert("width", "100");
    meta.insert(MetaField::Height, 200);

    assert_eq!(meta.get(MetaField::Width), meta.get("width"));
    assert_eq!(meta.get("height"), Some(&ParameterValue::from(200)));
}

#[test]
fn test_mixed_key_forms_feed_derived_fields() {
    let mut meta = Meta::new()
        .with(MetaField::Id, "dev forgot to slugify")
        .with("width", "100")
        .with(MetaField::Height, 200)
        .with(MetaField::Version, "v1");
    meta.insert("resolution", 1.0);

    let variables: ParameterMap = vec![
        ("title", ParameterValue::from("Hello world!")),
        ("description", ParameterValue::Null),
        ("img", ParameterValue::from("")),
    ]
    .into_iter()
    .collect();

    let set = build_parameter_set(&meta, &variables, false);
    assert_eq!(
        encode_query(&set.to_value()),
        "__v=v1&__id=dev+forgot+to+slugify&_w=100&_h=200&_res=1.0&title=Hello+world%21&img="
    );
}

#[test]
fn test_sets_are_independent_per_call() {
    let meta = Meta::new().with("v", 1);
    let variables: ParameterMap = vec![("a", "1")].into_iter().collect();
    let assembler = ParameterAssembler::new(&meta, &variables);

    let mut first = assembler.assemble(CacheBuster::Include).to_map();
    first.insert("a", "mutated");
    let second = assembler.assemble(CacheBuster::Include).to_map();

    assert_eq!(second.get("a"), Some(&ParameterValue::from("1")));
}

#[test]
fn test_variable_can_replace_cache_buster() {
    let meta = Meta::new().with("v", 1);
    let variables: ParameterMap = vec![("__v", "pinned")].into_iter().collect();
    let set = build_parameter_set(&meta, &variables, false);

    assert_eq!(set.to_map().get("__v"), Some(&ParameterValue::from("pinned")));
    assert_eq!(set.to_map().keys().next(), Some("__v"));
}

#[test]
fn test_unknown_meta_keys_are_ignored() {
    let meta = Meta::new().with("color", "red");
    let set = build_parameter_set(&meta, &ParameterMap::new(), true);
    assert_eq!(encode_query(&set.to_value()), "");
}

// Query encoding unit tests

use flyyer::query::{
    encode_query, encode_query_sorted, flatten, form_encode, stringify, PairOrdering, QueryEncoder,
};
use flyyer::{ParameterMap, ParameterValue};
use rstest::rstest;

fn map(entries: Vec<(&str, ParameterValue)>) -> ParameterValue {
    ParameterValue::Map(entries.into_iter().collect())
}

#[test]
fn test_stringifies_hash_of_primitives() {
    let value = map(vec![
        ("a", "hello".into()),
        ("b", 999.into()),
        ("c", false.into()),
        ("d", ParameterValue::Null),
    ]);
    assert_eq!(encode_query(&value), "a=hello&b=999&c=false");
}

#[test]
fn test_stringifies_complex_hash() {
    let value = map(vec![
        ("a", map(vec![("aa", "bar".into()), ("ab", "foo".into())])),
        (
            "b",
            ParameterValue::List(vec![
                map(vec![("c", "foo".into())]),
                map(vec![("c", "bar".into())]),
            ]),
        ),
    ]);
    assert_eq!(
        encode_query(&value),
        "a[aa]=bar&a[ab]=foo&b[0][c]=foo&b[1][c]=bar"
    );
}

#[test]
fn test_null_never_emits_key_at_any_depth() {
    let value = map(vec![
        ("top", ParameterValue::Null),
        ("nested", map(vec![("inner", ParameterValue::Null), ("kept", 1.into())])),
        ("list", ParameterValue::List(vec![ParameterValue::Null])),
    ]);
    let encoded = encode_query(&value);

    assert_eq!(encoded, "nested[kept]=1");
    assert!(!encoded.contains("top"));
    assert!(!encoded.contains("inner"));
    assert!(!encoded.contains("list"));
}

#[test]
fn test_both_orderings_share_escaping_and_null_policy() {
    let value = map(vec![
        ("z", "a b".into()),
        ("y", ParameterValue::Null),
        ("x", "ü/?".into()),
    ]);
    let insertion = encode_query(&value);
    let sorted = encode_query_sorted(&value);

    let mut insertion_pairs: Vec<&str> = insertion.split('&').collect();
    insertion_pairs.sort();
    assert_eq!(insertion_pairs.join("&"), sorted);
    assert_eq!(sorted, "x=%C3%BC%2F%3F&z=a+b");
}

#[test]
fn test_stringify_explicit_pairs() {
    let pairs = flatten(&map(vec![("b", 2.into()), ("a", 1.into())]), None);
    assert_eq!(stringify(&pairs, PairOrdering::Insertion), "b=2&a=1");
    assert_eq!(stringify(&pairs, PairOrdering::Sorted), "a=1&b=2");
}

#[test]
fn test_encoder_reports_its_ordering() {
    assert_eq!(QueryEncoder::default().ordering(), PairOrdering::Insertion);
    assert_eq!(QueryEncoder::sorted().ordering(), PairOrdering::Sorted);
}

#[test]
fn test_empty_map_encodes_to_empty_string() {
    assert_eq!(encode_query(&ParameterValue::Map(ParameterMap::new())), "");
}

#[rstest]
#[case("Hello world!", "Hello+world%21")]
#[case("*-._", "*-._")]
#[case("a~b", "a%7Eb")]
#[case("\u{f1}", "%C3%B1")]
#[case("a&b=c", "a%26b%3Dc")]
#[case("[x]", "%5Bx%5D")]
fn test_form_encode_matches_www_form(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(form_encode(input), expected);
}

#[test]
fn test_json_built_variables_keep_insertion_order() {
    let value = ParameterValue::from(serde_json::json!({"title": "T", "alpha": "A"}));
    assert_eq!(encode_query(&value), "title=T&alpha=A");
}

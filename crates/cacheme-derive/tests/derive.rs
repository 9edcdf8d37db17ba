use cacheme_derive::NodeKey;

#[derive(NodeKey)]
struct UserProfile {
    tenant: String,
    user_id: u64,
    #[node_key(skip)]
    #[allow(dead_code)]
    cache_bust: u8,
}

#[derive(NodeKey)]
struct Coordinate(i32, i32);

#[derive(NodeKey)]
#[node_key(separator = "/")]
struct Path {
    segment_a: String,
    segment_b: String,
}

#[derive(NodeKey)]
struct Singleton;

#[test]
fn named_fields_join_with_default_separator() {
    let profile = UserProfile {
        tenant: "acme".to_string(),
        user_id: 42,
        cache_bust: 7,
    };
    assert_eq!(profile.derived_key(), "acme:42");
}

#[test]
fn tuple_fields_join_in_declaration_order() {
    let point = Coordinate(3, -4);
    assert_eq!(point.derived_key(), "3:-4");
}

#[test]
fn custom_separator_is_honored() {
    let path = Path {
        segment_a: "a".to_string(),
        segment_b: "b".to_string(),
    };
    assert_eq!(path.derived_key(), "a/b");
}

#[test]
fn unit_struct_has_empty_key() {
    let singleton = Singleton;
    assert_eq!(singleton.derived_key(), "");
}

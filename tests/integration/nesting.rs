use envstruct::{Envstruct, Kind, LookupKeys, MockEnv, Provenance, Yaml};

use crate::common::builder;

#[derive(Debug, Default, PartialEq)]
struct Inner {
    field2: String,
}

envstruct::record!(Inner { field2 => [tag = "field2"] });

#[test]
fn test_untagged_record_is_transparent() {
    #[derive(Debug, Default, PartialEq)]
    struct Outer {
        field1: String,
        nested_field: Inner,
    }
    envstruct::record!(Outer {
        field1 => [tag = "field1"],
        nested_field,
    });

    let envstruct = builder([("PREFIX_FIELD1", "value"), ("PREFIX_FIELD2", "nestedvalue")]).build();
    let mut outer = Outer::default();
    envstruct.fetch(&mut outer).unwrap();

    assert_eq!(outer.field1, "value");
    assert_eq!(outer.nested_field.field2, "nestedvalue");
}

#[test]
fn test_tagged_record_adds_a_segment() {
    #[derive(Debug, Default, PartialEq)]
    struct Outer {
        field1: String,
        nested_field: Inner,
    }
    envstruct::record!(Outer {
        field1 => [tag = "field1"],
        nested_field => [tag = "nested"],
    });

    let envstruct = builder([
        ("PREFIX_FIELD1", "value"),
        ("PREFIX_NESTED_FIELD2", "nestedvalue"),
        ("PREFIX_FIELD2", "wrong"),
    ])
    .build();
    let mut outer = Outer::default();
    envstruct.fetch(&mut outer).unwrap();

    assert_eq!(outer.field1, "value");
    assert_eq!(outer.nested_field.field2, "nestedvalue");
}

#[derive(Debug, Default, PartialEq)]
struct Level2 {
    field2: String,
}

#[derive(Debug, Default, PartialEq)]
struct Level1 {
    nested_field2: Level2,
}

envstruct::record!(Level2 { field2 => [tag = "field"] });
envstruct::record!(Level1 { nested_field2 => [tag = "nested2"] });

#[test]
fn test_multi_level_nesting() {
    #[derive(Debug, Default, PartialEq)]
    struct Root {
        nested_field: Level1,
    }
    envstruct::record!(Root { nested_field => [tag = "nested"] });

    let envstruct = builder([("PREFIX_NESTED_NESTED2_FIELD", "nestedvalue")]).build();
    let mut root = Root::default();
    envstruct.fetch(&mut root).unwrap();

    assert_eq!(root.nested_field.nested_field2.field2, "nestedvalue");
}

#[test]
fn test_only_tagged_levels_contribute() {
    #[derive(Debug, Default, PartialEq)]
    struct Root {
        nested_field: Level1,
    }
    envstruct::record!(Root { nested_field });

    let envstruct = builder([("PREFIX_NESTED2_FIELD", "nestedvalue")]).build();
    let mut root = Root::default();
    envstruct.fetch(&mut root).unwrap();

    assert_eq!(root.nested_field.nested_field2.field2, "nestedvalue");
}

#[test]
fn test_siblings_do_not_share_segments() {
    #[derive(Debug, Default, PartialEq)]
    struct Pair {
        left: Inner,
        middle: Inner,
        right: Inner,
        last: String,
    }
    envstruct::record!(Pair {
        left => [tag = "left"],
        middle,
        right => [tag = "right"],
        last => [tag = "last"],
    });

    let envstruct = builder([
        ("PREFIX_LEFT_FIELD2", "l"),
        ("PREFIX_FIELD2", "m"),
        ("PREFIX_RIGHT_FIELD2", "r"),
        ("PREFIX_LAST", "x"),
    ])
    .build();
    let mut pair = Pair::default();
    let provenance = envstruct.fetch_with_provenance(&mut pair).unwrap();

    assert_eq!(pair.left.field2, "l");
    assert_eq!(pair.middle.field2, "m");
    assert_eq!(pair.right.field2, "r");
    assert_eq!(pair.last, "x");
    assert_eq!(
        provenance,
        vec![
            Provenance::new("left.field2", "PREFIX_LEFT_FIELD2", Kind::Scalar),
            Provenance::new("middle.field2", "PREFIX_FIELD2", Kind::Scalar),
            Provenance::new("right.field2", "PREFIX_RIGHT_FIELD2", Kind::Scalar),
            Provenance::new("last", "PREFIX_LAST", Kind::Scalar),
        ]
    );
}

#[test]
fn test_without_prefix_key_is_the_uppercased_tag() {
    #[derive(Debug, Default, PartialEq)]
    struct Flat {
        mixed_case: String,
    }
    envstruct::record!(Flat { mixed_case => [tag = "Mixed_Case"] });

    let envstruct = Envstruct::builder()
        .tag_key("tag")
        .unmarshaler(Yaml)
        .source(MockEnv::from_pairs([("MIXED_CASE", "ok"), ("Mixed_Case", "wrong")]))
        .build();
    let mut flat = Flat::default();
    envstruct.fetch(&mut flat).unwrap();

    assert_eq!(flat.mixed_case, "ok");
}

#[test]
fn test_untagged_leaf_without_prefix_never_matches() {
    #[derive(Debug, Default, PartialEq)]
    struct Flat {
        untagged: String,
    }
    envstruct::record!(Flat { untagged });

    let envstruct = Envstruct::builder()
        .tag_key("tag")
        .unmarshaler(Yaml)
        .source(MockEnv::from_pairs([("", "empty-name"), ("UNTAGGED", "x")]))
        .build();
    let mut flat = Flat::default();
    envstruct.fetch(&mut flat).unwrap();
    assert_eq!(flat.untagged, "");

    let keys = envstruct.lookup_keys::<Flat>().unwrap();
    assert_eq!(keys[0].keys, LookupKeys::Composed(String::new()));
    assert_eq!(keys[0].to_string(), "untagged (scalar): <none>");
}

#[derive(Debug, Default, PartialEq)]
struct Stripped {
    field1: String,
    field2: String,
    field3: i32,
    nested_field: StrippedInner,
}

#[derive(Debug, Default, PartialEq)]
struct StrippedInner {
    field4: String,
}

envstruct::record!(Stripped {
    field1 => [tag = "field1,omitempty"],
    field2,
    field3 => [tag = "field3"],
    nested_field => [tag = ",inline"],
});
envstruct::record!(StrippedInner { field4 => [tag = "field4,omitempty"] });

#[test]
fn test_strip_value_cuts_tags_at_comma() {
    let envstruct = builder([
        ("PREFIX_FIELD1", "value"),
        ("PREFIX_FIELD3", "3"),
        ("PREFIX_FIELD4", "nested_value"),
    ])
    .strip_value(true)
    .build();
    let mut stripped = Stripped::default();
    envstruct.fetch(&mut stripped).unwrap();

    assert_eq!(
        stripped,
        Stripped {
            field1: "value".into(),
            field2: String::new(),
            field3: 3,
            nested_field: StrippedInner {
                field4: "nested_value".into()
            },
        }
    );
}

#[test]
fn test_tags_are_used_whole_without_strip_value() {
    let envstruct = builder([("PREFIX_FIELD1,OMITEMPTY", "value")]).build();
    let mut stripped = Stripped::default();
    envstruct.fetch(&mut stripped).unwrap();

    assert_eq!(stripped.field1, "value");
}

#[test]
fn test_lookup_keys_report() {
    let envstruct = builder([]).strip_value(true).build();
    let keys: Vec<String> = envstruct
        .lookup_keys::<Stripped>()
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_eq!(
        keys,
        vec![
            "field1 (scalar): PREFIX_FIELD1",
            "field2 (scalar): PREFIX",
            "field3 (scalar): PREFIX_FIELD3",
            "nested_field.field4 (scalar): PREFIX_FIELD4",
        ]
    );
}

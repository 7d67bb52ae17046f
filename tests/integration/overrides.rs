use envstruct::{Kind, LookupKeys, Provenance};

use crate::common::builder;

#[derive(Debug, Default, PartialEq)]
struct Inner {
    field2: String,
}

#[derive(Debug, Default, PartialEq)]
struct Overridden {
    field1: String,
    nested_field: Inner,
}

envstruct::record!(Inner { field2 => [tag = "field2", override = "override_field"] });
envstruct::record!(Overridden {
    field1 => [tag = "field1"],
    nested_field => [tag = "nested"],
});

#[test]
fn test_override_bypasses_prefix_and_nesting() {
    let envstruct = builder([
        ("PREFIX_FIELD1", "value"),
        ("override_field", "nestedvalue"),
        ("PREFIX_NESTED_FIELD2", "wrong"),
    ])
    .override_key("override")
    .build();
    let mut overridden = Overridden::default();
    envstruct.fetch(&mut overridden).unwrap();

    assert_eq!(overridden.field1, "value");
    assert_eq!(overridden.nested_field.field2, "nestedvalue");
}

#[test]
fn test_override_tag_is_inert_unless_configured() {
    let envstruct = builder([
        ("override_field", "wrong"),
        ("PREFIX_NESTED_FIELD2", "composed"),
    ])
    .build();
    let mut overridden = Overridden::default();
    envstruct.fetch(&mut overridden).unwrap();

    assert_eq!(overridden.nested_field.field2, "composed");
}

#[test]
fn test_override_replaces_composed_key_entirely() {
    let envstruct = builder([("PREFIX_NESTED_FIELD2", "composed")])
        .override_key("override")
        .build();
    let mut overridden = Overridden::default();
    envstruct.fetch(&mut overridden).unwrap();

    assert_eq!(overridden.nested_field.field2, "");
}

#[derive(Debug, Default, PartialEq)]
struct Multi {
    field1: String,
    field2: String,
    field3: String,
}

envstruct::record!(Multi {
    field1 => [tag = "field1", override = "OVERRIDE_FIELD1_CAPS,override_field1"],
    field2 => [tag = "field2", override = "override_field2,OVERRIDE_FIELD2_CAPS"],
    field3 => [tag = "field3", override = "o1,o2"],
});

#[test]
fn test_first_present_override_wins() {
    let envstruct = builder([
        ("OVERRIDE_FIELD1_CAPS", "caps"),
        ("override_field1", "lower"),
        ("override_field2", "first"),
        ("OVERRIDE_FIELD2_CAPS", "second"),
        ("o2", "fallback"),
    ])
    .override_key("override")
    .build();
    let mut multi = Multi::default();
    let provenance = envstruct.fetch_with_provenance(&mut multi).unwrap();

    assert_eq!(
        multi,
        Multi {
            field1: "caps".into(),
            field2: "first".into(),
            field3: "fallback".into(),
        }
    );
    assert_eq!(
        provenance,
        vec![
            Provenance::new("field1", "OVERRIDE_FIELD1_CAPS", Kind::Scalar),
            Provenance::new("field2", "override_field2", Kind::Scalar),
            Provenance::new("field3", "o2", Kind::Scalar),
        ]
    );
}

#[test]
fn test_empty_override_value_falls_through() {
    let envstruct = builder([("o1", ""), ("o2", "second")])
        .override_key("override")
        .build();
    let mut multi = Multi::default();
    envstruct.fetch(&mut multi).unwrap();

    assert_eq!(multi.field3, "second");
}

#[test]
fn test_override_list_skips_empty_entries() {
    #[derive(Debug, Default)]
    struct Sparse {
        field: u32,
    }
    envstruct::record!(Sparse { field => [override = " , PORT ,"] });

    let envstruct = builder([("", "0"), ("PORT", "8080")])
        .override_key("override")
        .build();
    let mut sparse = Sparse::default();
    envstruct.fetch(&mut sparse).unwrap();
    assert_eq!(sparse.field, 8080);

    let keys = envstruct.lookup_keys::<Sparse>().unwrap();
    assert_eq!(
        keys[0].keys,
        LookupKeys::Override(vec![String::new(), "PORT".into(), String::new()])
    );
}

#[test]
fn test_override_applies_to_sequences() {
    #[derive(Debug, Default)]
    struct Hosts {
        hosts: Vec<String>,
    }
    envstruct::record!(Hosts { hosts => [tag = "hosts", override = "HOSTS"] });

    let envstruct = builder([("HOSTS", "a.example, b.example")])
        .override_key("override")
        .build();
    let mut hosts = Hosts::default();
    let provenance = envstruct.fetch_with_provenance(&mut hosts).unwrap();

    assert_eq!(hosts.hosts, vec!["a.example", "b.example"]);
    assert_eq!(provenance[0].to_string(), "hosts <- HOSTS");
    assert_eq!(provenance[0].kind, Kind::Sequence);
}

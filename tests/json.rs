#![cfg(feature = "json")]

use archivist::{
    load_object, load_object_with_options, save_object, save_object_with_options, Error,
    ErrorKind, FormatOptions, Json, Node, RootScope, SerializationOptions, Serialize, Timestamp,
    ValueScope,
};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default, PartialEq)]
struct Inner {
    b: u8,
    label: String,
}

impl Serialize for Inner {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        value.object(|object| {
            object.field("b", &mut self.b)?;
            object.field("label", &mut self.label)?;
            Ok(())
        })
    }
}

#[derive(Debug, Default, PartialEq)]
struct Outer {
    a: Vec<Inner>,
    created: Timestamp,
    counts: BTreeMap<u32, i64>,
    note: Option<String>,
}

impl Serialize for Outer {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        value.object(|object| {
            object.field("a", &mut self.a)?;
            object.field("created", &mut self.created)?;
            object.field("counts", &mut self.counts)?;
            object.field("note", &mut self.note)?;
            Ok(())
        })
    }
}

fn sample() -> Outer {
    let mut counts = BTreeMap::new();
    counts.insert(7, i64::MIN);
    counts.insert(11, i64::MAX);

    Outer {
        a: vec![
            Inner {
                b: 1,
                label: String::from("first"),
            },
            Inner {
                b: 255,
                label: String::from("ünïcödé ✓"),
            },
        ],
        created: Timestamp::new(1_689_374_691, 925).unwrap(),
        counts,
        note: None,
    }
}

#[test]
fn nested_roundtrip() {
    let mut outer = sample();
    let json = save_object::<Json, _>(&mut outer).unwrap();
    assert!(json.contains(r#""created":"2023-07-14T22:44:51.925Z""#));
    assert!(json.contains(r#""7":-9223372036854775808"#));

    let mut loaded = Outer::default();
    load_object::<Json, _>(&mut loaded, &json).unwrap();
    assert_eq!(loaded, outer);
}

#[test]
fn extreme_integers_survive() {
    let mut values = (i64::MIN, u64::MAX);
    let json = save_object::<Json, _>(&mut values).unwrap();
    assert_eq!(
        json,
        r#"{"key":-9223372036854775808,"value":18446744073709551615}"#
    );

    let mut loaded = (0i64, 0u64);
    load_object::<Json, _>(&mut loaded, &json).unwrap();
    assert_eq!(loaded, values);
}

#[test]
fn absent_members_keep_their_value() {
    let mut inner = Inner {
        b: 9,
        label: String::from("kept"),
    };
    load_object::<Json, _>(&mut inner, r#"{"b": 3}"#).unwrap();
    assert_eq!(inner.b, 3);
    assert_eq!(inner.label, "kept");
}

#[test]
fn null_is_a_no_op() {
    let mut inner = Inner {
        b: 9,
        label: String::from("kept"),
    };
    load_object::<Json, _>(&mut inner, r#"{"b": null, "label": null}"#).unwrap();
    assert_eq!(inner.b, 9);
    assert_eq!(inner.label, "kept");

    let mut note = Some(String::from("x"));
    load_object::<Json, _>(&mut note, "null").unwrap();
    assert_eq!(note, None);
}

#[test]
fn mismatch_reports_nested_path() {
    let mut outer = Outer::default();
    let data = r#"{"a": [{"b": 1}, {"b": "x"}]}"#;
    let err = load_object::<Json, _>(&mut outer, data).unwrap_err();
    match err.kind() {
        ErrorKind::MismatchedTypes { path, message } => {
            assert_eq!(path, "/a/1/b");
            assert_eq!(message, "expected number but found string");
        }
        kind => panic!("unexpected error: {:?}", kind),
    }
    assert_eq!(err.path(), Some("/a/1/b"));
}

#[test]
fn object_expected_but_array_found() {
    let mut inner = Inner::default();
    let err = load_object::<Json, _>(&mut inner, "[1, 2]").unwrap_err();
    match err.kind() {
        ErrorKind::MismatchedTypes { path, message } => {
            assert_eq!(path, "/");
            assert_eq!(message, "expected object but found array");
        }
        kind => panic!("unexpected error: {:?}", kind),
    }
}

#[test]
fn bad_timestamp_text_is_a_mismatch() {
    let mut outer = Outer::default();
    let err = load_object::<Json, _>(&mut outer, r#"{"created": "2023-13-01T00:00:00Z"}"#)
        .unwrap_err();
    match err.kind() {
        ErrorKind::MismatchedTypes { path, message } => {
            assert_eq!(path, "/created");
            assert_eq!(
                message,
                "invalid month in '2023-13-01T00:00:00Z', expected YYYY-MM-DDThh:mm:ss[.SSS]Z"
            );
        }
        kind => panic!("unexpected error: {:?}", kind),
    }
}

#[test]
fn garbage_timestamp_text_is_a_mismatch() {
    let mut created = Timestamp::default();
    let err = load_object::<Json, _>(&mut created, r#""hello""#).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MismatchedTypes { .. }));
    assert_eq!(err.path(), Some("/"));
}

#[test]
fn syntax_error_is_reported_before_traversal() {
    let mut outer = Outer::default();
    let err = load_object::<Json, _>(&mut outer, r#"{"a": [}"#).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Parsing { line: 1, .. }));
}

#[test]
fn pretty_printing_with_tabs() {
    let mut values = HashMap::new();
    values.insert(String::from("a"), 1u8);
    let options = SerializationOptions::new().with_format(
        FormatOptions::new()
            .with_pretty(true)
            .with_indent_char('\t')
            .with_indent_width(1),
    );
    let json = save_object_with_options::<Json, _>(&mut values, options).unwrap();
    assert_eq!(json, "{\n\t\"a\": 1\n}");
}

#[test]
fn visit_keys_enumerates_members() {
    let mut root =
        RootScope::<Json>::load_str(r#"{"z": 1, "a": 2}"#, SerializationOptions::default())
            .unwrap();
    let object = root.value().open_object(0).unwrap();
    let mut keys = Vec::new();
    object.visit_keys(|key| keys.push(key.to_string()));
    // serde_json's default map keeps keys sorted
    assert_eq!(keys, vec!["a", "z"]);
    assert!(object.contains_key("z"));
    assert!(!object.contains_key("y"));
}

#[test]
fn array_cursor_reports_progress() {
    let mut root =
        RootScope::<Json>::load_str("[10, 20, 30]", SerializationOptions::default()).unwrap();
    let mut array = root.value().open_array(0).unwrap();
    assert_eq!(array.path(), "/0");
    assert_eq!(array.estimated_remaining_size(), 3);

    let mut first = 0u8;
    array.element(&mut first).unwrap();
    assert_eq!(first, 10);
    assert_eq!(array.path(), "/0");

    let mut second = 0u8;
    array.element(&mut second).unwrap();
    assert_eq!(array.path(), "/1");
    assert_eq!(array.estimated_remaining_size(), 1);
    assert!(!array.is_end());

    let mut third = 0u8;
    array.element(&mut third).unwrap();
    assert!(array.is_end());

    let err = array.next_value().err().unwrap();
    match err.kind() {
        ErrorKind::OutOfRange { path, message } => {
            assert_eq!(path, "/2");
            assert_eq!(message, "No more items to load");
        }
        kind => panic!("unexpected error: {:?}", kind),
    }
}

#[test]
fn out_of_range_is_fatal_under_skip_policies() {
    let options = SerializationOptions::new()
        .with_overflow_number_policy(archivist::OverflowNumberPolicy::Skip)
        .with_mismatched_types_policy(archivist::MismatchedTypesPolicy::Skip);
    let mut target = [0u16; 4];
    let err = load_object_with_options::<Json, _>(&mut target, "[1, 2]", options).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::OutOfRange { .. }));
}

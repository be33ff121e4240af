use archivist::{
    load_object_from_node, save_object, Error, ErrorKind, Node, Portable, RootScope,
    SerializationOptions, Serialize, Timestamp, Value, ValueKind, ValueScope,
};
use std::collections::{HashSet, LinkedList};

#[derive(Debug, Default, PartialEq)]
struct Event {
    at: Timestamp,
    tags: HashSet<String>,
    history: LinkedList<(String, u16)>,
}

impl Serialize for Event {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        value.object(|object| {
            object.field("at", &mut self.at)?;
            object.field("tags", &mut self.tags)?;
            object.field("history", &mut self.history)?;
            Ok(())
        })
    }
}

fn event() -> Event {
    Event {
        at: Timestamp::from_millis(-1_500),
        tags: ["x", "y"].iter().map(|x| x.to_string()).collect(),
        history: [(String::from("open"), 1), (String::from("close"), 2)]
            .into_iter()
            .collect(),
    }
}

#[test]
fn document_keeps_native_values() {
    let doc = save_object::<Portable, _>(&mut event()).unwrap();
    assert_eq!(doc.kind(), ValueKind::Object);
    assert_eq!(
        doc.get("at"),
        Some(&Value::Timestamp(Timestamp::new(-2, 500).unwrap()))
    );

    let history = doc.get("history").and_then(|x| x.as_array()).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].get("key").and_then(|x| x.as_str()), Some("open"));
    assert_eq!(history[1].get("value"), Some(&Value::UInt(2)));
}

#[test]
fn roundtrip_through_document() {
    let mut source = event();
    let doc = save_object::<Portable, _>(&mut source).unwrap();
    let mut loaded = Event::default();
    load_object_from_node::<Portable, _>(&mut loaded, &doc, SerializationOptions::default())
        .unwrap();
    assert_eq!(loaded, source);
}

#[test]
fn timestamps_load_from_iso_text() {
    let mut doc = Value::default();
    doc.make_object(1);
    *doc.insert_member("at") = Value::String(String::from("1969-12-31T23:59:58.500Z"));

    let mut loaded = Event::default();
    load_object_from_node::<Portable, _>(&mut loaded, &doc, SerializationOptions::default())
        .unwrap();
    assert_eq!(loaded.at, Timestamp::from_millis(-1_500));
}

#[test]
fn root_scope_exposes_context() {
    let doc = Value::Int(7);
    let mut root = RootScope::<Portable>::load_borrowed(&doc, SerializationOptions::default());
    let mut value = 0u8;
    value.serialize(root.value()).unwrap();
    assert_eq!(value, 7);

    root.context_mut().add_error("/", "custom check failed");
    assert!(!root.context().is_valid());
    let err = root.finish().unwrap_err();
    match err.kind() {
        ErrorKind::FailedValidation(errors) => {
            assert_eq!(errors.get("/").unwrap(), ["custom check failed"]);
        }
        kind => panic!("unexpected error: {:?}", kind),
    }
}

#[test]
fn borrowed_documents_cannot_be_finalized() {
    let doc = Value::Null;
    let root = RootScope::<Portable>::load_borrowed(&doc, SerializationOptions::default());
    assert!(root.finalize().is_err());
}

#[test]
fn nested_scopes_open_in_both_directions() {
    let mut root = RootScope::<Portable>::save(SerializationOptions::default());
    {
        let mut object = root.value().open_object(1).unwrap();
        let mut array = object.open_array("xs", 2).unwrap();
        array.element(&mut 1u8).unwrap();
        array.element(&mut 2u8).unwrap();
    }
    let doc = root.finalize().unwrap();
    let xs = doc.get("xs").and_then(|x| x.as_array()).unwrap();
    assert_eq!(xs, [Value::UInt(1), Value::UInt(2)]);

    let mut root = RootScope::<Portable>::load_borrowed(&doc, SerializationOptions::default());
    let mut object = root.value().open_object(0).unwrap();
    assert_eq!(object.keys(), ["xs"]);
    assert!(object.open_object("xs", 0).is_none());
    let array = object.open_array("xs", 0).unwrap();
    assert_eq!(array.estimated_remaining_size(), 2);
}

#[test]
fn scalars_do_not_open_as_containers() {
    let doc = Value::Int(3);
    let mut root = RootScope::<Portable>::load_borrowed(&doc, SerializationOptions::default());
    assert!(root.value().open_object(0).is_none());
    assert!(root.value().open_array(0).is_none());
}

use archivist::{load_object, Json, Serialize};

#[derive(Serialize, Default)]
pub struct Model {
    human: bool,
    checksum: String,
    fourth: u16,
}

fn main() {
    let data = r#"{"human": true, "checksum": "abc", "fourth": 4}"#;
    let mut model = Model::default();
    load_object::<Json, _>(&mut model, data).unwrap();
    assert!(model.human);
    assert_eq!(model.checksum, "abc");
    assert_eq!(model.fourth, 4);
}

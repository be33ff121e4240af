use archivist::{load_object, save_object, Json, Serialize};
use std::path::PathBuf;

#[derive(Serialize, Default)]
pub struct Model {
    #[archive(text, required)]
    flag: bool,
    #[archive(text)]
    path: PathBuf,
}

fn main() {
    let mut model = Model {
        flag: true,
        path: PathBuf::from("a/b"),
    };
    let json = save_object::<Json, _>(&mut model).unwrap();
    assert_eq!(json, r#"{"flag":"true","path":"a/b"}"#);

    let mut loaded = Model::default();
    load_object::<Json, _>(&mut loaded, &json).unwrap();
    assert!(loaded.flag);
    assert_eq!(loaded.path, PathBuf::from("a/b"));
}

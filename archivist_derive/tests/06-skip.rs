use archivist::{save_object, Json, Serialize};

#[derive(Serialize, Default)]
pub struct Model {
    name: String,
    #[archive(skip)]
    cache: Vec<u8>,
}

#[derive(Serialize, Default)]
pub struct Empty {}

fn main() {
    let mut model = Model {
        name: String::from("x"),
        cache: vec![1, 2, 3],
    };
    assert_eq!(save_object::<Json, _>(&mut model).unwrap(), r#"{"name":"x"}"#);
    assert_eq!(save_object::<Json, _>(&mut Empty {}).unwrap(), "{}");
}

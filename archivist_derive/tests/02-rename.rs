use archivist::{load_object, save_object, Json, Serialize};

#[derive(Serialize, Default)]
pub struct Model {
    #[archive(rename = "Human")]
    human: bool,
    count: i32,
}

fn main() {
    let mut model = Model::default();
    load_object::<Json, _>(&mut model, r#"{"Human": true, "human": false, "count": -3}"#).unwrap();
    assert!(model.human);
    assert_eq!(model.count, -3);

    let json = save_object::<Json, _>(&mut model).unwrap();
    assert_eq!(json, r#"{"Human":true,"count":-3}"#);
}

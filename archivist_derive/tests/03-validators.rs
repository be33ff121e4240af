use archivist::{load_object, ErrorKind, Json, Serialize};

fn even(value: &u32, _loaded: bool) -> Option<String> {
    if value % 2 == 0 {
        None
    } else {
        Some(String::from("must be even"))
    }
}

#[derive(Serialize, Default)]
pub struct Model {
    #[archive(required, range(0, 10))]
    level: i8,
    #[archive(min_size = 1, max_size = 3)]
    tags: Vec<String>,
    #[archive(validate = "even")]
    count: u32,
}

fn main() {
    let mut model = Model::default();
    let data = r#"{"level": 12, "tags": ["a", "b", "c", "d"], "count": 3}"#;
    let err = load_object::<Json, _>(&mut model, data).unwrap_err();
    let errors = match err.kind() {
        ErrorKind::FailedValidation(errors) => errors,
        _ => panic!("expected validation errors"),
    };

    assert_eq!(errors.get("/level").unwrap(), ["Value must be between 0 and 10"]);
    assert_eq!(errors.get("/tags").unwrap().len(), 1);
    assert_eq!(errors.get("/count").unwrap(), ["must be even"]);
}

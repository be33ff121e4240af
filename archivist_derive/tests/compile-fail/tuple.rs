use archivist::Serialize;

#[derive(Serialize)]
pub struct Model(u8, u16);

fn main() {}

use archivist::{save_object, Error, Node, Portable, Serialize, ValueScope};

struct TooMany;

impl Serialize for TooMany {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        value.array(1, |array| {
            array.element(&mut 1u8)?;
            array.element(&mut 2u8)?;
            Ok(())
        })
    }
}

struct SameKey;

impl Serialize for SameKey {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        value.object(|object| {
            object.field("a", &mut 1u8)?;
            object.field("a", &mut 2u8)?;
            Ok(())
        })
    }
}

#[test]
#[should_panic(expected = "declared 1 elements but more were saved")]
fn saving_past_array_capacity_panics() {
    let _ = save_object::<Portable, _>(&mut TooMany);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "key 'a' saved twice")]
fn saving_a_key_twice_panics() {
    let _ = save_object::<Portable, _>(&mut SameKey);
}

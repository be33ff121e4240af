use super::Serialize;
use crate::{Error, ErrorKind, Mode, Node, ObjectScope, TextConvert, ValueScope};
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet, LinkedList, VecDeque};
use std::hash::{BuildHasher, Hash};

/// A null loads as `None`, anything else loads into the existing value or a
/// default one
impl<T: Serialize + Default> Serialize for Option<T> {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        if value.mode() == Mode::Save {
            return match self {
                Some(inner) => inner.serialize(value),
                None => value.serialize_null(),
            };
        }

        if value.is_null() {
            *self = None;
            return Ok(true);
        }

        match self {
            Some(inner) => inner.serialize(value),
            None => {
                let mut inner = T::default();
                let loaded = inner.serialize(value)?;
                if loaded {
                    *self = Some(inner);
                }
                Ok(loaded)
            }
        }
    }
}

/// Loading resizes to the stored element count, default constructing new
/// elements, and then loads every element in order
impl<T: Serialize + Default> Serialize for Vec<T> {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        let len = self.len();
        value.array(len, |array| {
            if array.mode() == Mode::Load {
                self.resize_with(array.len(), T::default);
            }

            for item in self.iter_mut() {
                array.element(item)?;
            }
            Ok(())
        })
    }
}

impl<T: Serialize + Default> Serialize for VecDeque<T> {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        let len = self.len();
        value.array(len, |array| {
            if array.mode() == Mode::Load {
                self.resize_with(array.len(), T::default);
            }

            for item in self.iter_mut() {
                array.element(item)?;
            }
            Ok(())
        })
    }
}

/// Fixed size arrays visit exactly their length, so loading fewer stored
/// elements fails with an out of range error
impl<T: Serialize, const L: usize> Serialize for [T; L] {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        value.array(L, |array| {
            for item in self.iter_mut() {
                array.element(item)?;
            }
            Ok(())
        })
    }
}

/// Serialize a collection through a vector holding its elements
///
/// The collection is emptied before a load so that it ends up holding only
/// the stored elements.
fn through_vec<C, T, N>(collection: &mut C, value: ValueScope<'_, N>) -> Result<bool, Error>
where
    C: Default + IntoIterator<Item = T> + FromIterator<T>,
    T: Serialize + Default,
    N: Node,
{
    let mut items: Vec<T> = match value.mode() {
        Mode::Save => std::mem::take(collection).into_iter().collect(),
        Mode::Load => {
            *collection = C::default();
            Vec::new()
        }
    };

    let result = items.serialize(value);
    *collection = items.into_iter().collect();
    result
}

impl<T: Serialize + Default> Serialize for LinkedList<T> {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        through_vec(self, value)
    }
}

impl<T: Serialize + Default + Ord> Serialize for BinaryHeap<T> {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        let mut items = std::mem::take(self).into_vec();
        if value.mode() == Mode::Load {
            items.clear();
        }

        let result = items.serialize(value);
        *self = BinaryHeap::from(items);
        result
    }
}

impl<T: Serialize + Default + Ord> Serialize for BTreeSet<T> {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        through_vec(self, value)
    }
}

impl<T, S> Serialize for HashSet<T, S>
where
    T: Serialize + Default + Eq + Hash,
    S: BuildHasher + Default,
{
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        through_vec(self, value)
    }
}

fn key_error<N: Node>(object: &ObjectScope<'_, N>, error: crate::ConvertError) -> Error {
    Error::new(ErrorKind::Convert {
        path: object.path(),
        error,
    })
}

/// Save every entry as an object member keyed by the key's text
fn save_entries<'k, K, V, N, I>(object: &mut ObjectScope<'_, N>, entries: I) -> Result<(), Error>
where
    K: TextConvert + 'k,
    V: Serialize + 'k,
    N: Node,
    I: Iterator<Item = (&'k K, &'k mut V)>,
{
    for (key, item) in entries {
        let key = key.to_text().map_err(|e| key_error(object, e))?;
        object.field(&key, item)?;
    }
    Ok(())
}

/// Load every object member, converting its key from text
fn load_entries<K, V, N, F>(object: &mut ObjectScope<'_, N>, mut insert: F) -> Result<(), Error>
where
    K: TextConvert,
    V: Serialize + Default,
    N: Node,
    F: FnMut(K, V),
{
    for key in object.keys() {
        let parsed = K::from_text(&key).map_err(|e| key_error(object, e))?;
        let mut item = V::default();
        if object.field(&key, &mut item)? {
            insert(parsed, item);
        }
    }
    Ok(())
}

/// Maps are objects whose member keys are the text of the map keys
impl<K, V> Serialize for BTreeMap<K, V>
where
    K: TextConvert + Ord,
    V: Serialize + Default,
{
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        let len = self.len();
        value.object_with_capacity(len, |object| match object.mode() {
            Mode::Save => save_entries(object, self.iter_mut()),
            Mode::Load => {
                self.clear();
                load_entries(object, |k, v| {
                    self.insert(k, v);
                })
            }
        })
    }
}

impl<K, V, S> Serialize for HashMap<K, V, S>
where
    K: TextConvert + Eq + Hash,
    V: Serialize + Default,
    S: BuildHasher,
{
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        let len = self.len();
        value.object_with_capacity(len, |object| match object.mode() {
            Mode::Save => save_entries(object, self.iter_mut()),
            Mode::Load => {
                self.clear();
                load_entries(object, |k, v| {
                    self.insert(k, v);
                })
            }
        })
    }
}

/// A pair is an object with a `key` and a `value` member
impl<K: Serialize, V: Serialize> Serialize for (K, V) {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        value.object_with_capacity(2, |object| {
            object.field("key", &mut self.0)?;
            object.field("value", &mut self.1)?;
            Ok(())
        })
    }
}

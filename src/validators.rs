//! Per-field checks run after a field is loaded.
//!
//! A validator sees the loaded value and whether the field was present in
//! the input. A failing validator returns the message that is recorded in
//! the archive's [`SerializationContext`](crate::SerializationContext).

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::Display;

/// A check applied to a loaded field
pub trait Validator<T: ?Sized> {
    /// Returns a message when the value is invalid
    fn validate(&self, value: &T, is_loaded: bool) -> Option<String>;
}

impl<T: ?Sized, F> Validator<T> for F
where
    F: Fn(&T, bool) -> Option<String>,
{
    fn validate(&self, value: &T, is_loaded: bool) -> Option<String> {
        self(value, is_loaded)
    }
}

/// Fails when the field was absent from the input or could not be loaded
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl<T: ?Sized> Validator<T> for Required {
    fn validate(&self, _value: &T, is_loaded: bool) -> Option<String> {
        if is_loaded {
            None
        } else {
            Some(String::from("This field is required"))
        }
    }
}

/// Fails when the value lies outside of `[min, max)`
///
/// ```
/// use archivist::{Range, Validator};
/// let range = Range::new(0, 100);
/// assert_eq!(range.validate(&0, true), None);
/// assert_eq!(range.validate(&99, true), None);
/// assert_eq!(range.validate(&100, true).unwrap(), "Value must be between 0 and 100");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Range<T> {
    min: T,
    max: T,
}

impl<T> Range<T> {
    pub fn new(min: T, max: T) -> Self {
        Range { min, max }
    }
}

impl<T: PartialOrd + Display> Validator<T> for Range<T> {
    fn validate(&self, value: &T, _is_loaded: bool) -> Option<String> {
        if *value < self.min || *value >= self.max {
            Some(format!("Value must be between {} and {}", self.min, self.max))
        } else {
            None
        }
    }
}

/// A value with a measurable number of elements
pub trait HasSize {
    fn size(&self) -> usize;
}

impl HasSize for str {
    fn size(&self) -> usize {
        self.chars().count()
    }
}

impl HasSize for String {
    fn size(&self) -> usize {
        self.as_str().size()
    }
}

impl<T> HasSize for [T] {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<T, const N: usize> HasSize for [T; N] {
    fn size(&self) -> usize {
        N
    }
}

impl<T> HasSize for Vec<T> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<T> HasSize for VecDeque<T> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<T> HasSize for BTreeSet<T> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<T, S> HasSize for HashSet<T, S> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<K, V> HasSize for BTreeMap<K, V> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<K, V, S> HasSize for HashMap<K, V, S> {
    fn size(&self) -> usize {
        self.len()
    }
}

/// Fails when the value has fewer than the given number of elements
#[derive(Debug, Clone, Copy)]
pub struct MinSize(pub usize);

impl<T: HasSize + ?Sized> Validator<T> for MinSize {
    fn validate(&self, value: &T, _is_loaded: bool) -> Option<String> {
        if value.size() < self.0 {
            Some(format!("The minimum size of this field should be {}.", self.0))
        } else {
            None
        }
    }
}

/// Fails when the value has more than the given number of elements
///
/// ```
/// use archivist::{MaxSize, Validator};
/// assert!(MaxSize(3).validate("abc", true).is_none());
/// assert!(MaxSize(3).validate("abcd", true).is_some());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MaxSize(pub usize);

impl<T: HasSize + ?Sized> Validator<T> for MaxSize {
    fn validate(&self, value: &T, _is_loaded: bool) -> Option<String> {
        if value.size() > self.0 {
            Some(format!(
                "The maximum size of this field should be not greater than {}.",
                self.0
            ))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_only_checks_presence() {
        assert!(Validator::<i32>::validate(&Required, &0, true).is_none());
        assert_eq!(
            Validator::<i32>::validate(&Required, &0, false).unwrap(),
            "This field is required"
        );
    }

    #[test]
    fn range_is_half_open() {
        let range = Range::new(-1.0, 1.0);
        assert!(range.validate(&-1.0, true).is_none());
        assert!(range.validate(&0.99, true).is_none());
        assert!(range.validate(&1.0, true).is_some());
        assert!(range.validate(&-1.5, false).is_some());
    }

    #[test]
    fn sizes() {
        assert!(MinSize(2).validate(&vec![1], true).is_some());
        assert!(MinSize(2).validate(&vec![1, 2], true).is_none());
        assert!(MaxSize(2).validate(&vec![1, 2], true).is_none());
        assert_eq!(
            MaxSize(2).validate(&vec![1, 2, 3], true).unwrap(),
            "The maximum size of this field should be not greater than 2."
        );
        assert_eq!(
            MinSize(1).validate("", true).unwrap(),
            "The minimum size of this field should be 1."
        );
    }

    #[test]
    fn closures_are_validators() {
        let even = |x: &i32, _: bool| (x % 2 != 0).then(|| String::from("odd"));
        assert!(even.validate(&2, true).is_none());
        assert!(even.validate(&3, true).is_some());
    }
}

use super::Serialize;
use crate::convert::{U16String, U32String};
use crate::{DateTime, Error, Node, Timestamp, UnixTime, ValueScope};
use std::path::PathBuf;
use std::time::SystemTime;

impl Serialize for bool {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        value.serialize_bool(self)
    }
}

macro_rules! number_serialize {
    ($($ty:ty),*) => {$(
        impl Serialize for $ty {
            fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
                value.serialize_number(self)
            }
        }
    )*};
}

number_serialize!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Serialize for String {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        value.serialize_string(self)
    }
}

impl Serialize for Timestamp {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        value.serialize_timestamp(self)
    }
}

macro_rules! text_serialize {
    ($($ty:ty),*) => {$(
        impl Serialize for $ty {
            fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
                value.serialize_text(self)
            }
        }
    )*};
}

text_serialize!(DateTime, UnixTime, SystemTime, PathBuf, U16String, U32String);

impl Serialize for () {
    fn serialize<N: Node>(&mut self, value: ValueScope<'_, N>) -> Result<bool, Error> {
        value.serialize_null()
    }
}

use crate::Scalar;
use std::fmt::Display;

/// Reason a scalar could not become the requested number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastError {
    /// The value is numeric but does not fit the target without loss
    Overflow,

    /// The value is not numeric
    Mismatch,
}

/// A fixed width integer or floating point type that can be stored natively
///
/// Every cast is checked: a value crosses types only when it is exactly
/// representable in the target, with the exception of `f64` to `f32`
/// narrowing which rounds but still rejects magnitudes beyond `f32::MAX`.
pub trait Number: Copy + Display + Sized + 'static {
    /// The native scalar this number is stored as
    fn to_scalar(self) -> Scalar<'static>;

    fn cast_i64(value: i64) -> Option<Self>;

    fn cast_u64(value: u64) -> Option<Self>;

    fn cast_f64(value: f64) -> Option<Self>;

    /// Booleans are only accepted by integer targets
    fn cast_bool(value: bool) -> Option<Self>;
}

/// Narrow a stored scalar into the requested number
///
/// ```
/// use archivist::{cast_number, CastError, Scalar};
/// assert_eq!(cast_number::<u8>(&Scalar::Int(255)), Ok(255));
/// assert_eq!(cast_number::<u8>(&Scalar::Int(256)), Err(CastError::Overflow));
/// assert_eq!(cast_number::<i32>(&Scalar::Float(3.14)), Err(CastError::Overflow));
/// assert_eq!(cast_number::<i32>(&Scalar::Str("1")), Err(CastError::Mismatch));
/// ```
pub fn cast_number<T: Number>(scalar: &Scalar) -> Result<T, CastError> {
    match *scalar {
        Scalar::Int(x) => T::cast_i64(x).ok_or(CastError::Overflow),
        Scalar::UInt(x) => T::cast_u64(x).ok_or(CastError::Overflow),
        Scalar::Float(x) => T::cast_f64(x).ok_or(CastError::Overflow),
        Scalar::Bool(x) => T::cast_bool(x).ok_or(CastError::Mismatch),
        _ => Err(CastError::Mismatch),
    }
}

/// Whether `value` is an integral float in [-2^(bits-1), 2^(bits-1)) or,
/// for unsigned targets, [0, 2^bits)
#[inline]
fn integral_in_range(value: f64, bits: u32, signed: bool) -> bool {
    if value.trunc() != value {
        return false;
    }

    if signed {
        let bound = 2f64.powi(bits as i32 - 1);
        value >= -bound && value < bound
    } else {
        value >= 0.0 && value < 2f64.powi(bits as i32)
    }
}

macro_rules! signed_number {
    ($($ty:ty),*) => {$(
        impl Number for $ty {
            #[inline]
            fn to_scalar(self) -> Scalar<'static> {
                Scalar::Int(self as i64)
            }

            #[inline]
            fn cast_i64(value: i64) -> Option<Self> {
                <$ty>::try_from(value).ok()
            }

            #[inline]
            fn cast_u64(value: u64) -> Option<Self> {
                <$ty>::try_from(value).ok()
            }

            #[inline]
            fn cast_f64(value: f64) -> Option<Self> {
                if integral_in_range(value, <$ty>::BITS, true) {
                    Some(value as $ty)
                } else {
                    None
                }
            }

            #[inline]
            fn cast_bool(value: bool) -> Option<Self> {
                Some(if value { 1 } else { 0 })
            }
        }
    )*};
}

macro_rules! unsigned_number {
    ($($ty:ty),*) => {$(
        impl Number for $ty {
            #[inline]
            fn to_scalar(self) -> Scalar<'static> {
                Scalar::UInt(self as u64)
            }

            #[inline]
            fn cast_i64(value: i64) -> Option<Self> {
                <$ty>::try_from(value).ok()
            }

            #[inline]
            fn cast_u64(value: u64) -> Option<Self> {
                <$ty>::try_from(value).ok()
            }

            #[inline]
            fn cast_f64(value: f64) -> Option<Self> {
                if integral_in_range(value, <$ty>::BITS, false) {
                    Some(value as $ty)
                } else {
                    None
                }
            }

            #[inline]
            fn cast_bool(value: bool) -> Option<Self> {
                Some(if value { 1 } else { 0 })
            }
        }
    )*};
}

signed_number!(i8, i16, i32, i64, isize);
unsigned_number!(u8, u16, u32, u64, usize);

/// The float reproduces `expected` exactly when cast back
#[inline]
fn exact_i64(float: f64, expected: i64) -> bool {
    integral_in_range(float, 64, true) && float as i64 == expected
}

#[inline]
fn exact_u64(float: f64, expected: u64) -> bool {
    integral_in_range(float, 64, false) && float as u64 == expected
}

impl Number for f64 {
    #[inline]
    fn to_scalar(self) -> Scalar<'static> {
        Scalar::Float(self)
    }

    #[inline]
    fn cast_i64(value: i64) -> Option<Self> {
        let result = value as f64;
        exact_i64(result, value).then_some(result)
    }

    #[inline]
    fn cast_u64(value: u64) -> Option<Self> {
        let result = value as f64;
        exact_u64(result, value).then_some(result)
    }

    #[inline]
    fn cast_f64(value: f64) -> Option<Self> {
        Some(value)
    }

    #[inline]
    fn cast_bool(_value: bool) -> Option<Self> {
        None
    }
}

impl Number for f32 {
    #[inline]
    fn to_scalar(self) -> Scalar<'static> {
        Scalar::Float(f64::from(self))
    }

    #[inline]
    fn cast_i64(value: i64) -> Option<Self> {
        let result = value as f32;
        exact_i64(f64::from(result), value).then_some(result)
    }

    #[inline]
    fn cast_u64(value: u64) -> Option<Self> {
        let result = value as f32;
        exact_u64(f64::from(result), value).then_some(result)
    }

    #[inline]
    fn cast_f64(value: f64) -> Option<Self> {
        if value.is_finite() && value.abs() > f64::from(f32::MAX) {
            None
        } else {
            Some(value as f32)
        }
    }

    #[inline]
    fn cast_bool(_value: bool) -> Option<Self> {
        None
    }
}

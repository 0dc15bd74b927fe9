//! Conversions from decoded scalars into record field types.
//!
//! Policy for lossy pairs:
//! - integer into a float field: accepted (widening)
//! - float into an integer field: rejected, even for whole numbers
//! - integer into a narrower integer field: accepted only when it fits
//! - `f64` into `f32`: accepted with rounding, rejected when out of range

use std::collections::{BTreeMap, HashMap};

use crate::entity::Scalar;

/// A field type that can be assigned from a [`Scalar`].
pub trait FromScalar: Sized {
    /// `None` means the value's kind is not convertible to `Self`.
    fn from_scalar(value: &Scalar) -> Option<Self>;

    /// Type name reported in `TypeMismatch` errors.
    fn expected_type() -> String;
}

impl FromScalar for Scalar {
    fn from_scalar(value: &Scalar) -> Option<Self> {
        Some(value.clone())
    }

    fn expected_type() -> String {
        "Scalar".to_string()
    }
}

impl FromScalar for String {
    fn from_scalar(value: &Scalar) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn expected_type() -> String {
        "String".to_string()
    }
}

impl FromScalar for bool {
    fn from_scalar(value: &Scalar) -> Option<Self> {
        value.as_bool()
    }

    fn expected_type() -> String {
        "bool".to_string()
    }
}

macro_rules! impl_from_scalar_int {
    ($($t:ty),*) => {
        $(
            impl FromScalar for $t {
                fn from_scalar(value: &Scalar) -> Option<Self> {
                    value.as_i64().and_then(|i| <$t>::try_from(i).ok())
                }

                fn expected_type() -> String {
                    stringify!($t).to_string()
                }
            }
        )*
    };
}

impl_from_scalar_int!(i64, i32, i16, i8, u64, u32, u16, u8);

impl FromScalar for f64 {
    fn from_scalar(value: &Scalar) -> Option<Self> {
        value.as_f64()
    }

    fn expected_type() -> String {
        "f64".to_string()
    }
}

impl FromScalar for f32 {
    fn from_scalar(value: &Scalar) -> Option<Self> {
        let f = value.as_f64()?;
        let narrowed = f as f32;
        // rounding is fine, overflowing to infinity is not
        if f.is_finite() && narrowed.is_infinite() {
            return None;
        }
        Some(narrowed)
    }

    fn expected_type() -> String {
        "f32".to_string()
    }
}

/// `null` becomes `None`; anything else must convert to `T`.
impl<T: FromScalar> FromScalar for Option<T> {
    fn from_scalar(value: &Scalar) -> Option<Self> {
        match value {
            Scalar::Null => Some(None),
            other => T::from_scalar(other).map(Some),
        }
    }

    fn expected_type() -> String {
        format!("Option<{}>", T::expected_type())
    }
}

impl<T: FromScalar> FromScalar for Vec<T> {
    fn from_scalar(value: &Scalar) -> Option<Self> {
        value.as_list()?.iter().map(T::from_scalar).collect()
    }

    fn expected_type() -> String {
        format!("Vec<{}>", T::expected_type())
    }
}

impl<T: FromScalar> FromScalar for HashMap<String, T> {
    fn from_scalar(value: &Scalar) -> Option<Self> {
        value
            .as_map()?
            .iter()
            .map(|(k, v)| T::from_scalar(v).map(|v| (k.clone(), v)))
            .collect()
    }

    fn expected_type() -> String {
        format!("HashMap<String, {}>", T::expected_type())
    }
}

impl<T: FromScalar> FromScalar for BTreeMap<String, T> {
    fn from_scalar(value: &Scalar) -> Option<Self> {
        value
            .as_map()?
            .iter()
            .map(|(k, v)| T::from_scalar(v).map(|v| (k.clone(), v)))
            .collect()
    }

    fn expected_type() -> String {
        format!("BTreeMap<String, {}>", T::expected_type())
    }
}

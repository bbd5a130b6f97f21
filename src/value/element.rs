// License: MIT

use std::fmt;

use crate::tag::ElementType;

use super::scalar::{Complex, Scalar};
use super::uniform::UniformVector;

/// A Rust primitive that can live inside a `Scalar` or a `UniformVector`.
///
/// This is the compile-time half of the type table; `ElementType::info`
/// is the runtime half.
pub trait Element: Clone + PartialEq + fmt::Debug + 'static {
    const ELEMENT: ElementType;

    fn into_scalar(self) -> Scalar;

    fn from_scalar(scalar: &Scalar) -> Option<Self>;

    fn into_uniform(items: Vec<Self>) -> UniformVector;

    fn slice(uniform: &UniformVector) -> Option<&[Self]>;

    fn vec_mut(uniform: &mut UniformVector) -> Option<&mut Vec<Self>>;
}

macro_rules! impl_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const ELEMENT: ElementType = ElementType::$variant;

                fn into_scalar(self) -> Scalar {
                    Scalar::$variant(self)
                }

                fn from_scalar(scalar: &Scalar) -> Option<Self> {
                    match scalar {
                        Scalar::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }

                fn into_uniform(items: Vec<Self>) -> UniformVector {
                    UniformVector::$variant(items)
                }

                fn slice(uniform: &UniformVector) -> Option<&[Self]> {
                    match uniform {
                        UniformVector::$variant(items) => Some(items.as_slice()),
                        _ => None,
                    }
                }

                fn vec_mut(uniform: &mut UniformVector) -> Option<&mut Vec<Self>> {
                    match uniform {
                        UniformVector::$variant(items) => Some(items),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_element! {
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    Complex<f32> => C32,
    Complex<f64> => C64,
    bool => Bool,
    String => String,
}

// License: MIT

use crate::error::PmtError;
use crate::tag::TypeTag;

use super::element::Element;
use super::scalar::{Complex, Scalar};
use super::{MapValue, Pmt, UniformVector, Value, VectorValue};

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<UniformVector> for Value {
    fn from(uniform: UniformVector) -> Self {
        Value::UniformVector(uniform)
    }
}

impl From<VectorValue> for Value {
    fn from(vector: VectorValue) -> Self {
        Value::Vector(vector)
    }
}

impl From<MapValue> for Value {
    fn from(map: MapValue) -> Self {
        Value::Map(map)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<Value> for Pmt {
    fn from(value: Value) -> Self {
        Pmt::new(value)
    }
}

impl From<Scalar> for Pmt {
    fn from(scalar: Scalar) -> Self {
        Pmt::new(Value::Scalar(scalar))
    }
}

impl From<UniformVector> for Pmt {
    fn from(uniform: UniformVector) -> Self {
        Pmt::new(Value::UniformVector(uniform))
    }
}

impl From<VectorValue> for Pmt {
    fn from(vector: VectorValue) -> Self {
        Pmt::new(Value::Vector(vector))
    }
}

impl From<MapValue> for Pmt {
    fn from(map: MapValue) -> Self {
        Pmt::new(Value::Map(map))
    }
}

impl From<&str> for Pmt {
    fn from(s: &str) -> Self {
        Pmt::new(Value::from(s))
    }
}

/// Primitives become scalars, `Vec`s of primitives become uniform vectors,
/// and both can be read back out of a `Pmt` with `TryFrom`.
macro_rules! impl_primitive_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Scalar(v.into_scalar())
                }
            }

            impl From<$ty> for Pmt {
                fn from(v: $ty) -> Self {
                    Pmt::new(Value::from(v))
                }
            }

            impl From<Vec<$ty>> for Value {
                fn from(items: Vec<$ty>) -> Self {
                    Value::UniformVector(UniformVector::from_vec(items))
                }
            }

            impl From<Vec<$ty>> for Pmt {
                fn from(items: Vec<$ty>) -> Self {
                    Pmt::new(Value::from(items))
                }
            }

            impl TryFrom<&Pmt> for $ty {
                type Error = PmtError;

                fn try_from(pmt: &Pmt) -> Result<Self, Self::Error> {
                    pmt.get::<$ty>()
                }
            }

            impl TryFrom<&Pmt> for Vec<$ty> {
                type Error = PmtError;

                fn try_from(pmt: &Pmt) -> Result<Self, Self::Error> {
                    match &*pmt.borrow() {
                        Value::UniformVector(uniform) => uniform.as_slice::<$ty>().map(|items| items.to_vec()),
                        other => Err(PmtError::type_mismatch(
                            TypeTag::UniformVector(<$ty as Element>::ELEMENT).to_string(),
                            other.type_tag(),
                        )),
                    }
                }
            }
        )*
    };
}

impl_primitive_conversions! {
    u8, u16, u32, u64,
    i8, i16, i32, i64,
    f32, f64,
    Complex<f32>, Complex<f64>,
    bool, String,
}

// License: MIT

use std::fmt;

use crate::error::PmtError;
use crate::tag::{ElementType, TypeTag};

use super::element::Element;

/// A complex number with real and imaginary parts of the same float type.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

impl<T: fmt::Display> fmt::Display for Complex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.re, self.im)
    }
}

/// Exactly one primitive payload.
///
/// Scalars are never mutated in place; build a new one to change the value.
/// Equality is the primitive's own `==`, so `NaN != NaN`.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    C32(Complex<f32>),
    C64(Complex<f64>),
    Bool(bool),
    String(String),
}

impl Scalar {
    pub fn element_type(&self) -> ElementType {
        match self {
            Scalar::U8(_) => ElementType::U8,
            Scalar::U16(_) => ElementType::U16,
            Scalar::U32(_) => ElementType::U32,
            Scalar::U64(_) => ElementType::U64,
            Scalar::I8(_) => ElementType::I8,
            Scalar::I16(_) => ElementType::I16,
            Scalar::I32(_) => ElementType::I32,
            Scalar::I64(_) => ElementType::I64,
            Scalar::F32(_) => ElementType::F32,
            Scalar::F64(_) => ElementType::F64,
            Scalar::C32(_) => ElementType::C32,
            Scalar::C64(_) => ElementType::C64,
            Scalar::Bool(_) => ElementType::Bool,
            Scalar::String(_) => ElementType::String,
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        TypeTag::Scalar(self.element_type())
    }

    /// Extract the payload as `T`, failing when `T` is not the stored type.
    ///
    /// No numeric widening happens: an `I32` scalar does not read as `i64`.
    pub fn get<T: Element>(&self) -> Result<T, PmtError> {
        T::from_scalar(self)
            .ok_or_else(|| PmtError::type_mismatch(TypeTag::Scalar(T::ELEMENT).to_string(), self.type_tag()))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::U8(v) => write!(f, "{}", v),
            Scalar::U16(v) => write!(f, "{}", v),
            Scalar::U32(v) => write!(f, "{}", v),
            Scalar::U64(v) => write!(f, "{}", v),
            Scalar::I8(v) => write!(f, "{}", v),
            Scalar::I16(v) => write!(f, "{}", v),
            Scalar::I32(v) => write!(f, "{}", v),
            Scalar::I64(v) => write!(f, "{}", v),
            Scalar::F32(v) => write!(f, "{}", v),
            Scalar::F64(v) => write!(f, "{}", v),
            Scalar::C32(v) => write!(f, "{}", v),
            Scalar::C64(v) => write!(f, "{}", v),
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::String(v) => f.write_str(v),
        }
    }
}

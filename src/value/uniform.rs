// License: MIT

use std::fmt;

use crate::error::PmtError;
use crate::tag::{ElementType, TypeTag};

use super::element::Element;
use super::scalar::{Complex, Scalar};

/// Homogeneous, contiguous sequence of one primitive type.
///
/// The element type is fixed at construction; `set` and `push` reject
/// scalars of any other type.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformVector {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    C32(Vec<Complex<f32>>),
    C64(Vec<Complex<f64>>),
    Bool(Vec<bool>),
    String(Vec<String>),
}

/// Run `$body` with `$items` bound to the typed backing `Vec`.
macro_rules! with_items {
    ($uniform:expr, $items:ident => $body:expr) => {
        match $uniform {
            UniformVector::U8($items) => $body,
            UniformVector::U16($items) => $body,
            UniformVector::U32($items) => $body,
            UniformVector::U64($items) => $body,
            UniformVector::I8($items) => $body,
            UniformVector::I16($items) => $body,
            UniformVector::I32($items) => $body,
            UniformVector::I64($items) => $body,
            UniformVector::F32($items) => $body,
            UniformVector::F64($items) => $body,
            UniformVector::C32($items) => $body,
            UniformVector::C64($items) => $body,
            UniformVector::Bool($items) => $body,
            UniformVector::String($items) => $body,
        }
    };
}

pub(crate) use with_items;

impl UniformVector {
    /// An empty vector of the given element type.
    pub fn new(element: ElementType) -> Self {
        match element {
            ElementType::U8 => UniformVector::U8(Vec::new()),
            ElementType::U16 => UniformVector::U16(Vec::new()),
            ElementType::U32 => UniformVector::U32(Vec::new()),
            ElementType::U64 => UniformVector::U64(Vec::new()),
            ElementType::I8 => UniformVector::I8(Vec::new()),
            ElementType::I16 => UniformVector::I16(Vec::new()),
            ElementType::I32 => UniformVector::I32(Vec::new()),
            ElementType::I64 => UniformVector::I64(Vec::new()),
            ElementType::F32 => UniformVector::F32(Vec::new()),
            ElementType::F64 => UniformVector::F64(Vec::new()),
            ElementType::C32 => UniformVector::C32(Vec::new()),
            ElementType::C64 => UniformVector::C64(Vec::new()),
            ElementType::Bool => UniformVector::Bool(Vec::new()),
            ElementType::String => UniformVector::String(Vec::new()),
        }
    }

    pub fn from_vec<T: Element>(items: Vec<T>) -> Self {
        T::into_uniform(items)
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            UniformVector::U8(_) => ElementType::U8,
            UniformVector::U16(_) => ElementType::U16,
            UniformVector::U32(_) => ElementType::U32,
            UniformVector::U64(_) => ElementType::U64,
            UniformVector::I8(_) => ElementType::I8,
            UniformVector::I16(_) => ElementType::I16,
            UniformVector::I32(_) => ElementType::I32,
            UniformVector::I64(_) => ElementType::I64,
            UniformVector::F32(_) => ElementType::F32,
            UniformVector::F64(_) => ElementType::F64,
            UniformVector::C32(_) => ElementType::C32,
            UniformVector::C64(_) => ElementType::C64,
            UniformVector::Bool(_) => ElementType::Bool,
            UniformVector::String(_) => ElementType::String,
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        TypeTag::UniformVector(self.element_type())
    }

    pub fn len(&self) -> usize {
        with_items!(self, items => items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Result<Scalar, PmtError> {
        let length = self.len();
        with_items!(self, items => items
            .get(index)
            .cloned()
            .map(Element::into_scalar)
            .ok_or_else(|| PmtError::index_out_of_range(index, length)))
    }

    pub fn set(&mut self, index: usize, scalar: Scalar) -> Result<(), PmtError> {
        let length = self.len();
        let expected = self.type_tag();
        with_items!(self, items => {
            let slot = items
                .get_mut(index)
                .ok_or_else(|| PmtError::index_out_of_range(index, length))?;
            *slot = Element::from_scalar(&scalar)
                .ok_or_else(|| mismatch(expected, &scalar))?;
            Ok(())
        })
    }

    pub fn push(&mut self, scalar: Scalar) -> Result<(), PmtError> {
        let expected = self.type_tag();
        with_items!(self, items => {
            let item = Element::from_scalar(&scalar)
                .ok_or_else(|| mismatch(expected, &scalar))?;
            items.push(item);
            Ok(())
        })
    }

    /// Borrow the typed payload, failing when `T` is not the element type.
    pub fn as_slice<T: Element>(&self) -> Result<&[T], PmtError> {
        let found = self.type_tag();
        T::slice(self)
            .ok_or_else(|| PmtError::type_mismatch(TypeTag::UniformVector(T::ELEMENT).to_string(), found))
    }

    pub fn as_vec_mut<T: Element>(&mut self) -> Result<&mut Vec<T>, PmtError> {
        let found = self.type_tag();
        T::vec_mut(self)
            .ok_or_else(|| PmtError::type_mismatch(TypeTag::UniformVector(T::ELEMENT).to_string(), found))
    }

    /// Elements as owned scalars, in order.
    pub fn scalars(&self) -> impl Iterator<Item = Scalar> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index).ok())
    }
}

fn mismatch(expected: TypeTag, scalar: &Scalar) -> PmtError {
    let element = expected.element_type().map_or(String::new(), |e| e.to_string());
    PmtError::type_mismatch(format!("element {}", element), scalar.type_tag())
}

impl fmt::Display for UniformVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        with_items!(self, items => {
            for item in items {
                write!(f, "{}, ", item)?;
            }
        });
        f.write_str("]")
    }
}

// License: MIT

pub mod codec;
pub mod error;
pub mod export;
pub mod tag;
pub mod value;

pub use codec::{DecodeOptions, decode, decode_prefix, decode_with_options, encode};
pub use error::PmtError;
pub use tag::{ElementType, TypeTag};
pub use value::{Complex, Element, MapValue, Pmt, Scalar, UniformVector, Value, VectorValue};

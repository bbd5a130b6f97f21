// License: MIT

use std::collections::BTreeMap;

use crate::error::PmtError;
use crate::tag::{ElementType, TAG_MAP, TAG_NULL, TAG_UNIFORM_VECTOR, TAG_VECTOR};
use crate::value::{Complex, Element, MapValue, Pmt, Scalar, UniformVector, Value, VectorValue};

use super::DecodeOptions;
use super::reader::Reader;
use super::wire::{Wire, read_string};

/// What one tag and its immediate payload turned out to be.
enum Header {
    Complete(Value),
    Vector(usize),
    Map(usize),
}

/// A container whose children are still being read.
enum Partial {
    Vector {
        items: Vec<Pmt>,
        remaining: usize,
    },
    Map {
        entries: BTreeMap<String, Pmt>,
        key: String,
        remaining: usize,
    },
}

impl Partial {
    fn finish(self) -> Pmt {
        match self {
            Partial::Vector { items, .. } => Pmt::new(Value::Vector(VectorValue::from_items(items))),
            Partial::Map { entries, .. } => Pmt::new(Value::Map(MapValue::from_entries(entries))),
        }
    }
}

/// Decode one value starting at the reader's position.
///
/// Containers are assembled on an explicit stack. Nothing is handed back
/// unless the whole value decoded, so a failure leaves no partial result.
pub(crate) fn decode_value(reader: &mut Reader<'_>, options: &DecodeOptions) -> Result<Pmt, PmtError> {
    let mut stack: Vec<Partial> = Vec::new();

    loop {
        let header_offset = reader.position();
        let mut done = match read_header(reader)? {
            Header::Complete(value) => Pmt::new(value),
            Header::Vector(0) => {
                check_depth(stack.len(), options, header_offset)?;
                Pmt::vector()
            }
            Header::Map(0) => {
                check_depth(stack.len(), options, header_offset)?;
                Pmt::map()
            }
            Header::Vector(len) => {
                check_depth(stack.len(), options, header_offset)?;
                stack.push(Partial::Vector {
                    items: Vec::with_capacity(len.min(reader.remaining())),
                    remaining: len,
                });
                continue;
            }
            Header::Map(len) => {
                check_depth(stack.len(), options, header_offset)?;
                let key = read_key(reader)?;
                stack.push(Partial::Map {
                    entries: BTreeMap::new(),
                    key,
                    remaining: len,
                });
                continue;
            }
        };

        // Hand the finished value to its parent, closing every container it completes.
        loop {
            let complete = match stack.last_mut() {
                None => return Ok(done),
                Some(Partial::Vector { items, remaining }) => {
                    items.push(done);
                    *remaining -= 1;
                    *remaining == 0
                }
                Some(Partial::Map { entries, key, remaining }) => {
                    let offset = reader.position();
                    let finished_key = std::mem::take(key);
                    if entries.contains_key(&finished_key) {
                        return Err(PmtError::malformed(format!("duplicate map key '{}'", finished_key), offset));
                    }
                    entries.insert(finished_key, done);
                    *remaining -= 1;
                    if *remaining > 0 {
                        *key = read_key(reader)?;
                    }
                    *remaining == 0
                }
            };

            if !complete {
                break;
            }

            let partial = stack
                .pop()
                .ok_or_else(|| PmtError::malformed("container stack underflow", reader.position()))?;
            done = partial.finish();
        }
    }
}

fn check_depth(depth: usize, options: &DecodeOptions, offset: usize) -> Result<(), PmtError> {
    if depth >= options.max_depth {
        return Err(PmtError::limit_exceeded(
            format!("nesting deeper than {} containers", options.max_depth),
            offset,
        ));
    }
    Ok(())
}

fn read_key(reader: &mut Reader<'_>) -> Result<String, PmtError> {
    let offset = reader.position();
    let key = read_string(reader)?;
    if key.is_empty() {
        return Err(PmtError::malformed("empty map key", offset));
    }
    Ok(key)
}

/// A container count can never exceed the bytes left, since every child
/// takes at least one.
fn read_count(reader: &mut Reader<'_>) -> Result<usize, PmtError> {
    let offset = reader.position();
    let count = reader.read_len()?;
    if count > reader.remaining() {
        return Err(PmtError::truncated(offset, count, reader.remaining()));
    }
    Ok(count)
}

fn read_header(reader: &mut Reader<'_>) -> Result<Header, PmtError> {
    let offset = reader.position();
    let tag = reader.read_byte()?;

    match tag {
        TAG_NULL => Ok(Header::Complete(Value::Null)),
        TAG_VECTOR => Ok(Header::Vector(read_count(reader)?)),
        TAG_MAP => Ok(Header::Map(read_count(reader)?)),
        TAG_UNIFORM_VECTOR => {
            let element_offset = reader.position();
            let code = reader.read_byte()?;
            let element = ElementType::from_code(code)
                .ok_or_else(|| PmtError::unknown_type(code, element_offset))?;
            let uniform = read_uniform(reader, element)?;
            Ok(Header::Complete(Value::UniformVector(uniform)))
        }
        code => match ElementType::from_code(code) {
            Some(element) => Ok(Header::Complete(Value::Scalar(read_scalar(reader, element)?))),
            None => Err(PmtError::unknown_type(code, offset)),
        },
    }
}

fn read_scalar(reader: &mut Reader<'_>, element: ElementType) -> Result<Scalar, PmtError> {
    Ok(match element {
        ElementType::U8 => Scalar::U8(u8::take(reader)?),
        ElementType::U16 => Scalar::U16(u16::take(reader)?),
        ElementType::U32 => Scalar::U32(u32::take(reader)?),
        ElementType::U64 => Scalar::U64(u64::take(reader)?),
        ElementType::I8 => Scalar::I8(i8::take(reader)?),
        ElementType::I16 => Scalar::I16(i16::take(reader)?),
        ElementType::I32 => Scalar::I32(i32::take(reader)?),
        ElementType::I64 => Scalar::I64(i64::take(reader)?),
        ElementType::F32 => Scalar::F32(f32::take(reader)?),
        ElementType::F64 => Scalar::F64(f64::take(reader)?),
        ElementType::C32 => Scalar::C32(Complex::<f32>::take(reader)?),
        ElementType::C64 => Scalar::C64(Complex::<f64>::take(reader)?),
        ElementType::Bool => Scalar::Bool(bool::take(reader)?),
        ElementType::String => Scalar::String(String::take(reader)?),
    })
}

fn read_uniform(reader: &mut Reader<'_>, element: ElementType) -> Result<UniformVector, PmtError> {
    let offset = reader.position();
    let len = reader.read_len()?;

    // Fixed-width payloads are checked up front so a bogus length cannot
    // trigger a huge allocation.
    match element.width() {
        Some(width) => {
            let needed = len
                .checked_mul(width)
                .ok_or_else(|| PmtError::limit_exceeded(format!("uniform vector of {} elements", len), offset))?;
            reader.ensure(needed)?;
        }
        None => {
            if len > reader.remaining() {
                return Err(PmtError::truncated(offset, len, reader.remaining()));
            }
        }
    }

    Ok(match element {
        ElementType::U8 => read_items::<u8>(reader, len)?,
        ElementType::U16 => read_items::<u16>(reader, len)?,
        ElementType::U32 => read_items::<u32>(reader, len)?,
        ElementType::U64 => read_items::<u64>(reader, len)?,
        ElementType::I8 => read_items::<i8>(reader, len)?,
        ElementType::I16 => read_items::<i16>(reader, len)?,
        ElementType::I32 => read_items::<i32>(reader, len)?,
        ElementType::I64 => read_items::<i64>(reader, len)?,
        ElementType::F32 => read_items::<f32>(reader, len)?,
        ElementType::F64 => read_items::<f64>(reader, len)?,
        ElementType::C32 => read_items::<Complex<f32>>(reader, len)?,
        ElementType::C64 => read_items::<Complex<f64>>(reader, len)?,
        ElementType::Bool => read_items::<bool>(reader, len)?,
        ElementType::String => read_items::<String>(reader, len)?,
    })
}

fn read_items<T: Wire + Element>(reader: &mut Reader<'_>, len: usize) -> Result<UniformVector, PmtError> {
    let mut items = Vec::with_capacity(len.min(reader.remaining()));
    for _ in 0..len {
        items.push(T::take(reader)?);
    }
    Ok(T::into_uniform(items))
}

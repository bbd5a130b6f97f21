// License: MIT

use crate::tag::{TAG_MAP, TAG_NULL, TAG_UNIFORM_VECTOR, TAG_VECTOR};
use crate::value::{Pmt, Scalar, UniformVector, Value, with_items};

use super::wire::{Wire, varint_len, write_str, write_varint};

enum Pending {
    Value(Pmt),
    Key(String),
}

/// Append the encoding of `root` to `out`.
///
/// Map entries are written in ascending key order, so equal values always
/// produce identical bytes.
pub(crate) fn encode_into(root: &Pmt, out: &mut Vec<u8>) {
    let mut pending = vec![Pending::Value(root.clone())];

    while let Some(step) = pending.pop() {
        match step {
            Pending::Key(key) => write_str(&key, out),
            Pending::Value(pmt) => {
                let value = pmt.borrow();
                match &*value {
                    Value::Null => out.push(TAG_NULL),
                    Value::Scalar(scalar) => write_scalar(scalar, out),
                    Value::UniformVector(uniform) => write_uniform(uniform, out),
                    Value::Vector(vector) => {
                        out.push(TAG_VECTOR);
                        write_varint(vector.len() as u64, out);
                        pending.extend(vector.iter().rev().cloned().map(Pending::Value));
                    }
                    Value::Map(map) => {
                        out.push(TAG_MAP);
                        write_varint(map.len() as u64, out);
                        for (key, item) in map.iter().rev() {
                            pending.push(Pending::Value(item.clone()));
                            pending.push(Pending::Key(key.clone()));
                        }
                    }
                }
            }
        }
    }
}

/// Size of the encoding of `root`, walked the same way as `encode_into`
/// but without producing any bytes.
pub(crate) fn encoded_len(root: &Pmt) -> usize {
    let mut pending = vec![root.clone()];
    let mut total = 0;

    while let Some(pmt) = pending.pop() {
        let value = pmt.borrow();
        total += match &*value {
            Value::Null => 1,
            Value::Scalar(scalar) => 1 + scalar_payload_len(scalar),
            Value::UniformVector(uniform) => {
                let items: usize = with_items!(uniform, items => items.iter().map(Wire::size).sum());
                2 + varint_len(uniform.len() as u64) + items
            }
            Value::Vector(vector) => {
                pending.extend(vector.iter().cloned());
                1 + varint_len(vector.len() as u64)
            }
            Value::Map(map) => {
                let mut header = 1 + varint_len(map.len() as u64);
                for (key, item) in map.iter() {
                    header += varint_len(key.len() as u64) + key.len();
                    pending.push(item.clone());
                }
                header
            }
        };
    }
    total
}

fn scalar_payload_len(scalar: &Scalar) -> usize {
    match scalar {
        Scalar::U8(v) => v.size(),
        Scalar::U16(v) => v.size(),
        Scalar::U32(v) => v.size(),
        Scalar::U64(v) => v.size(),
        Scalar::I8(v) => v.size(),
        Scalar::I16(v) => v.size(),
        Scalar::I32(v) => v.size(),
        Scalar::I64(v) => v.size(),
        Scalar::F32(v) => v.size(),
        Scalar::F64(v) => v.size(),
        Scalar::C32(v) => v.size(),
        Scalar::C64(v) => v.size(),
        Scalar::Bool(v) => v.size(),
        Scalar::String(v) => v.size(),
    }
}

fn write_scalar(scalar: &Scalar, out: &mut Vec<u8>) {
    out.push(scalar.element_type().code());
    match scalar {
        Scalar::U8(v) => v.put(out),
        Scalar::U16(v) => v.put(out),
        Scalar::U32(v) => v.put(out),
        Scalar::U64(v) => v.put(out),
        Scalar::I8(v) => v.put(out),
        Scalar::I16(v) => v.put(out),
        Scalar::I32(v) => v.put(out),
        Scalar::I64(v) => v.put(out),
        Scalar::F32(v) => v.put(out),
        Scalar::F64(v) => v.put(out),
        Scalar::C32(v) => v.put(out),
        Scalar::C64(v) => v.put(out),
        Scalar::Bool(v) => v.put(out),
        Scalar::String(v) => v.put(out),
    }
}

fn write_uniform(uniform: &UniformVector, out: &mut Vec<u8>) {
    out.push(TAG_UNIFORM_VECTOR);
    out.push(uniform.element_type().code());
    write_varint(uniform.len() as u64, out);
    with_items!(uniform, items => {
        for item in items {
            item.put(out);
        }
    });
}

// License: MIT

use serde_json::json;

use crate::error::PmtError;
use crate::value::{Pmt, Scalar, UniformVector, Value};

/// Containers nested deeper than this are refused instead of recursing further.
const MAX_EXPORT_DEPTH: usize = 256;

/// Export a value to JSON for diagnostics.
///
/// Conversions:
/// - integers, floats, bools, strings → direct mapping (non-finite floats → `null`)
/// - complex numbers → `[re, im]`
/// - uniform vectors and vectors → arrays
/// - maps → objects, keys in ascending order
/// - null → `null`
///
/// The result drops the element types, so it cannot be turned back into
/// the same value. Use the binary codec for that.
///
/// # Examples
/// ```
/// use pmt_value::{Pmt, export};
///
/// let map = Pmt::map();
/// map.insert("gain", Pmt::from(0.5f64)).unwrap();
/// let json = export::to_json(&map).unwrap();
/// assert_eq!(json["gain"], 0.5);
/// ```
pub fn to_json(value: &Pmt) -> Result<serde_json::Value, PmtError> {
    value_to_json(&value.borrow(), 0)
}

/// Pretty-printed JSON text for a value.
pub fn to_json_string(value: &Pmt) -> Result<String, PmtError> {
    let json = to_json(value)?;
    serde_json::to_string_pretty(&json)
        .map_err(|e| PmtError::malformed(format!("Failed to render JSON: {}", e), 0))
}

fn value_to_json(value: &Value, depth: usize) -> Result<serde_json::Value, PmtError> {
    if depth > MAX_EXPORT_DEPTH {
        return Err(PmtError::limit_exceeded(
            format!("JSON export deeper than {} levels", MAX_EXPORT_DEPTH),
            0,
        ));
    }

    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Scalar(scalar) => scalar_to_json(scalar),
        Value::UniformVector(uniform) => uniform_to_json(uniform),
        Value::Vector(vector) => {
            let mut items = Vec::with_capacity(vector.len());
            for item in vector {
                items.push(value_to_json(&item.borrow(), depth + 1)?);
            }
            serde_json::Value::Array(items)
        }
        Value::Map(map) => {
            let mut object = serde_json::Map::new();
            for (key, item) in map {
                object.insert(key.clone(), value_to_json(&item.borrow(), depth + 1)?);
            }
            serde_json::Value::Object(object)
        }
    })
}

fn scalar_to_json(scalar: &Scalar) -> serde_json::Value {
    match scalar {
        Scalar::U8(v) => json!(v),
        Scalar::U16(v) => json!(v),
        Scalar::U32(v) => json!(v),
        Scalar::U64(v) => json!(v),
        Scalar::I8(v) => json!(v),
        Scalar::I16(v) => json!(v),
        Scalar::I32(v) => json!(v),
        Scalar::I64(v) => json!(v),
        Scalar::F32(v) => json!(v),
        Scalar::F64(v) => json!(v),
        Scalar::C32(v) => json!([v.re, v.im]),
        Scalar::C64(v) => json!([v.re, v.im]),
        Scalar::Bool(v) => json!(v),
        Scalar::String(v) => json!(v),
    }
}

fn uniform_to_json(uniform: &UniformVector) -> serde_json::Value {
    serde_json::Value::Array(uniform.scalars().map(|s| scalar_to_json(&s)).collect())
}

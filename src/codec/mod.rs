// License: MIT

//! Binary wire format.
//!
//! Every value starts with one tag byte:
//!
//! | tag           | payload                                                    |
//! |---------------|------------------------------------------------------------|
//! | `0x00`        | null, no payload                                           |
//! | `0x01..=0x0E` | scalar of that element code, fixed-width little endian     |
//! | `0x20`        | uniform vector: element code, varint length, raw elements  |
//! | `0x30`        | vector: varint length, tagged children                     |
//! | `0x40`        | map: varint count, then `key length, key bytes, child`     |
//!
//! Strings are a varint byte length followed by UTF-8. Complex numbers are
//! the real part then the imaginary part. Varints are unsigned LEB128.

use serde::{Deserialize, Serialize};

use crate::error::PmtError;
use crate::value::Pmt;

mod decode;
mod encode;
mod reader;
mod wire;

use reader::Reader;

/// Limits applied while decoding untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Maximum number of nested containers.
    pub max_depth: usize,
    /// Accept input that continues past the first value.
    pub allow_trailing: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: 1024,
            allow_trailing: false,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn allow_trailing(mut self, allow: bool) -> Self {
        self.allow_trailing = allow;
        self
    }
}

/// Encode a value and everything below it.
pub fn encode(value: &Pmt) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(value, &mut out);
    out
}

/// Append the encoding of `value` to `out`.
pub fn encode_into(value: &Pmt, out: &mut Vec<u8>) {
    let start = out.len();
    encode::encode_into(value, out);
    log::trace!("encoded {} into {} bytes", value.type_tag(), out.len() - start);
}

/// Size in bytes of the encoding of `value`, computed without encoding it.
pub fn encoded_len(value: &Pmt) -> usize {
    encode::encoded_len(value)
}

/// Decode exactly one value occupying the whole buffer.
///
/// # Errors
/// - `UnknownType` for a tag or element code this version does not know
/// - `Truncated` when the buffer ends early
/// - `Malformed` for invalid payloads or trailing bytes
/// - `LimitExceeded` when nesting exceeds the default depth limit
pub fn decode(bytes: &[u8]) -> Result<Pmt, PmtError> {
    decode_with_options(bytes, &DecodeOptions::default())
}

pub fn decode_with_options(bytes: &[u8], options: &DecodeOptions) -> Result<Pmt, PmtError> {
    let mut reader = Reader::new(bytes);
    let value = run(&mut reader, options)?;

    if !options.allow_trailing && !reader.is_empty() {
        let err = PmtError::malformed(
            format!("{} trailing bytes after value", reader.remaining()),
            reader.position(),
        );
        log::debug!("decode failed: {}", err);
        return Err(err);
    }
    Ok(value)
}

/// Decode the value at the front of `bytes`, returning it with the number
/// of bytes it occupied. Useful for buffers holding several values back to back.
pub fn decode_prefix(bytes: &[u8]) -> Result<(Pmt, usize), PmtError> {
    let mut reader = Reader::new(bytes);
    let value = run(&mut reader, &DecodeOptions::default())?;
    Ok((value, reader.position()))
}

fn run(reader: &mut Reader<'_>, options: &DecodeOptions) -> Result<Pmt, PmtError> {
    let start = reader.position();
    match decode::decode_value(reader, options) {
        Ok(value) => {
            log::trace!("decoded {} from {} bytes", value.type_tag(), reader.position() - start);
            Ok(value)
        }
        Err(err) => {
            log::debug!("decode failed: {}", err);
            Err(err)
        }
    }
}

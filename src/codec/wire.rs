// License: MIT

use crate::error::PmtError;
use crate::value::Complex;

use super::reader::Reader;

/// Write an unsigned varint (LEB128).
pub(crate) fn write_varint(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Bytes `write_varint` spends on `value`.
pub(crate) fn varint_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}

pub(crate) fn write_str(s: &str, out: &mut Vec<u8>) {
    write_varint(s.len() as u64, out);
    out.extend_from_slice(s.as_bytes());
}

pub(crate) fn read_string(reader: &mut Reader<'_>) -> Result<String, PmtError> {
    let len = reader.read_len()?;
    let start = reader.position();
    let bytes = reader.read_bytes(len)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| PmtError::malformed("string is not valid UTF-8", start))
}

/// Fixed layout of one primitive payload, without a type tag.
pub(crate) trait Wire: Sized {
    fn put(&self, out: &mut Vec<u8>);

    /// Bytes `put` appends for this value.
    fn size(&self) -> usize;

    fn take(reader: &mut Reader<'_>) -> Result<Self, PmtError>;
}

macro_rules! impl_wire_le {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Wire for $ty {
                fn put(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                fn size(&self) -> usize {
                    std::mem::size_of::<$ty>()
                }

                fn take(reader: &mut Reader<'_>) -> Result<Self, PmtError> {
                    let bytes = reader.read_array::<{ std::mem::size_of::<$ty>() }>()?;
                    Ok(<$ty>::from_le_bytes(bytes))
                }
            }
        )*
    };
}

impl_wire_le!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl<T: Wire> Wire for Complex<T> {
    fn put(&self, out: &mut Vec<u8>) {
        self.re.put(out);
        self.im.put(out);
    }

    fn size(&self) -> usize {
        self.re.size() + self.im.size()
    }

    fn take(reader: &mut Reader<'_>) -> Result<Self, PmtError> {
        let re = T::take(reader)?;
        let im = T::take(reader)?;
        Ok(Complex::new(re, im))
    }
}

impl Wire for bool {
    fn put(&self, out: &mut Vec<u8>) {
        out.push(u8::from(*self));
    }

    fn size(&self) -> usize {
        1
    }

    fn take(reader: &mut Reader<'_>) -> Result<Self, PmtError> {
        let offset = reader.position();
        match reader.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(PmtError::malformed(format!("invalid bool byte 0x{:02x}", other), offset)),
        }
    }
}

impl Wire for String {
    fn put(&self, out: &mut Vec<u8>) {
        write_str(self, out);
    }

    fn size(&self) -> usize {
        varint_len(self.len() as u64) + self.len()
    }

    fn take(reader: &mut Reader<'_>) -> Result<Self, PmtError> {
        read_string(reader)
    }
}

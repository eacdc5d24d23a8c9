//! Byte-stream primitives for network synchronization.
//!
//! Numbers are big-endian, booleans are a single byte and strings are
//! UTF-8 prefixed with a VarInt byte length. Every read is bounds-checked
//! so a truncated or hostile packet yields `CodecError` instead of a panic.

use crate::error::CodecError;
use crate::id::ResourceId;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Longest string (in bytes) accepted on the wire.
pub const MAX_STRING_LENGTH: usize = 32767;

/// Append-only writer over a growable buffer.
///
/// # Examples
///
/// ```rust
/// use skilltree::wire::{WireReader, WireWriter};
///
/// let mut writer = WireWriter::new();
/// writer.write_int(7);
/// writer.write_utf("skilltree:damage").unwrap();
///
/// let mut reader = WireReader::new(writer.freeze());
/// assert_eq!(reader.read_int().unwrap(), 7);
/// assert_eq!(reader.read_utf().unwrap(), "skilltree:damage");
/// ```
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: BytesMut,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_int(&mut self, value: i32) {
        self.buf.put_i32(value);
    }

    pub fn write_float(&mut self, value: f32) {
        self.buf.put_f32(value);
    }

    pub fn write_double(&mut self, value: f64) {
        self.buf.put_f64(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.put_u8(u8::from(value));
    }

    pub fn write_var_int(&mut self, value: i32) {
        let mut value = value as u32;
        loop {
            if value & !0x7F == 0 {
                self.buf.put_u8(value as u8);
                return;
            }
            self.buf.put_u8((value & 0x7F | 0x80) as u8);
            value >>= 7;
        }
    }

    pub fn write_utf(&mut self, value: &str) -> Result<(), CodecError> {
        if value.len() > MAX_STRING_LENGTH {
            return Err(CodecError::StringTooLong(value.len()));
        }
        self.write_var_int(value.len() as i32);
        self.buf.put_slice(value.as_bytes());
        Ok(())
    }

    pub fn write_id(&mut self, id: &ResourceId) -> Result<(), CodecError> {
        self.write_utf(id.as_str())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finish writing and hand the bytes to the transport.
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Cursor over received bytes.
#[derive(Debug, Clone)]
pub struct WireReader {
    buf: Bytes,
}

impl WireReader {
    pub fn new(buf: Bytes) -> Self {
        Self { buf }
    }

    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn ensure(&self, needed: usize) -> Result<(), CodecError> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            return Err(CodecError::UnexpectedEof { needed, remaining });
        }
        Ok(())
    }

    pub fn read_int(&mut self) -> Result<i32, CodecError> {
        self.ensure(4)?;
        Ok(self.buf.get_i32())
    }

    pub fn read_float(&mut self) -> Result<f32, CodecError> {
        self.ensure(4)?;
        Ok(self.buf.get_f32())
    }

    pub fn read_double(&mut self) -> Result<f64, CodecError> {
        self.ensure(8)?;
        Ok(self.buf.get_f64())
    }

    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        self.ensure(1)?;
        Ok(self.buf.get_u8() != 0)
    }

    pub fn read_var_int(&mut self) -> Result<i32, CodecError> {
        let mut value: u32 = 0;
        for position in 0..5 {
            self.ensure(1)?;
            let byte = self.buf.get_u8();
            value |= u32::from(byte & 0x7F) << (7 * position);
            if byte & 0x80 == 0 {
                return Ok(value as i32);
            }
        }
        Err(CodecError::VarIntTooLong)
    }

    pub fn read_utf(&mut self) -> Result<String, CodecError> {
        let length = self.read_var_int()?;
        if length < 0 {
            return Err(CodecError::InvalidLength(length));
        }
        let length = length as usize;
        if length > MAX_STRING_LENGTH {
            return Err(CodecError::StringTooLong(length));
        }
        self.ensure(length)?;
        let raw = self.buf.copy_to_bytes(length);
        String::from_utf8(raw.to_vec()).map_err(|_| CodecError::InvalidUtf8)
    }

    pub fn read_id(&mut self) -> Result<ResourceId, CodecError> {
        ResourceId::parse(&self.read_utf()?)
    }

    /// Read a collection count written with `write_int`.
    pub fn read_count(&mut self) -> Result<usize, CodecError> {
        let count = self.read_int()?;
        if count < 0 {
            return Err(CodecError::InvalidLength(count));
        }
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives_are_big_endian() {
        let mut writer = WireWriter::new();
        writer.write_int(1);
        writer.write_bool(true);
        let bytes = writer.freeze();
        assert_eq!(&bytes[..], &[0, 0, 0, 1, 1]);
    }

    #[test]
    fn test_var_int_widths() {
        let cases = [(0, 1), (127, 1), (128, 2), (25565, 3), (-1, 5)];
        for (value, width) in cases {
            let mut writer = WireWriter::new();
            writer.write_var_int(value);
            assert_eq!(writer.len(), width, "width of {value}");
            let mut reader = WireReader::new(writer.freeze());
            assert_eq!(reader.read_var_int().unwrap(), value);
        }
    }

    #[test]
    fn test_truncated_read_fails_cleanly() {
        let mut reader = WireReader::from_slice(&[0, 0]);
        assert_eq!(
            reader.read_int(),
            Err(CodecError::UnexpectedEof {
                needed: 4,
                remaining: 2
            })
        );
    }

    #[test]
    fn test_string_length_prefix() {
        let mut writer = WireWriter::new();
        writer.write_utf("héllo").unwrap();
        let bytes = writer.freeze();
        assert_eq!(bytes[0], 6);

        let mut reader = WireReader::new(bytes);
        assert_eq!(reader.read_utf().unwrap(), "héllo");
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_string_too_long() {
        let long = "a".repeat(MAX_STRING_LENGTH + 1);
        let mut writer = WireWriter::new();
        assert_eq!(
            writer.write_utf(&long),
            Err(CodecError::StringTooLong(MAX_STRING_LENGTH + 1))
        );
    }

    #[test]
    fn test_invalid_utf8() {
        let mut reader = WireReader::from_slice(&[2, 0xC3, 0x28]);
        assert_eq!(reader.read_utf(), Err(CodecError::InvalidUtf8));
    }

    #[test]
    fn test_negative_count() {
        let mut writer = WireWriter::new();
        writer.write_int(-3);
        let mut reader = WireReader::new(writer.freeze());
        assert_eq!(reader.read_count(), Err(CodecError::InvalidLength(-3)));
    }
}

//! Big-endian wire primitives.
//!
//! Length prefix layout (strings and arrays):
//!
//! ```text
//! len < 255:   +--------+
//!              |  len   |  1 byte, unsigned
//!              +--------+
//! len >= 255:  +--------+-------------------+
//!              |  0xFF  | len (i32, BE)     |  5 bytes
//!              +--------+-------------------+
//! ```

use crate::error::ProtocolError;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Lengths below this value use the one-byte prefix form.
pub const SHORT_LENGTH_LIMIT: usize = 255;

const LONG_LENGTH_MARKER: u8 = 0xFF;

/// Append-only big-endian writer for packet bodies.
#[derive(Debug, Default)]
pub struct PacketWriter {
    buf: BytesMut,
}

impl PacketWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Writes a single boolean as one byte (0 or 1).
    pub fn put_bool(&mut self, value: bool) {
        self.buf.put_u8(value as u8);
    }

    pub fn put_i8(&mut self, value: i8) {
        self.buf.put_i8(value);
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn put_i16(&mut self, value: i16) {
        self.buf.put_i16(value);
    }

    pub fn put_u16(&mut self, value: u16) {
        self.buf.put_u16(value);
    }

    pub fn put_i32(&mut self, value: i32) {
        self.buf.put_i32(value);
    }

    pub fn put_i64(&mut self, value: i64) {
        self.buf.put_i64(value);
    }

    pub fn put_f32(&mut self, value: f32) {
        self.buf.put_f32(value);
    }

    pub fn put_f64(&mut self, value: f64) {
        self.buf.put_f64(value);
    }

    pub fn put_slice(&mut self, data: &[u8]) {
        self.buf.put_slice(data);
    }

    /// Writes a sequence length prefix.
    pub fn put_length(&mut self, len: usize) -> Result<(), ProtocolError> {
        if len < SHORT_LENGTH_LIMIT {
            self.buf.put_u8(len as u8);
            return Ok(());
        }
        let len = i32::try_from(len).map_err(|_| ProtocolError::LengthOverflow(len))?;
        self.buf.put_u8(LONG_LENGTH_MARKER);
        self.buf.put_i32(len);
        Ok(())
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn put_str(&mut self, value: &str) -> Result<(), ProtocolError> {
        self.put_length(value.len())?;
        self.buf.put_slice(value.as_bytes());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> BytesMut {
        self.buf
    }

    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Bounds-checked big-endian reader over a borrowed buffer.
///
/// Every read that would run past the end fails with
/// [`ProtocolError::Short`] and leaves the reader where it was.
#[derive(Debug, Clone)]
pub struct PacketReader<'a> {
    buf: &'a [u8],
    total: usize,
}

impl<'a> PacketReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            total: buf.len(),
        }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.total - self.buf.len()
    }

    fn ensure(&self, needed: usize) -> Result<(), ProtocolError> {
        if self.buf.len() < needed {
            return Err(ProtocolError::Short {
                needed,
                remaining: self.buf.len(),
            });
        }
        Ok(())
    }

    /// Reads a single boolean byte. Any non-zero value is true.
    pub fn get_bool(&mut self) -> Result<bool, ProtocolError> {
        Ok(self.get_u8()? != 0)
    }

    pub fn get_i8(&mut self) -> Result<i8, ProtocolError> {
        self.ensure(1)?;
        Ok(self.buf.get_i8())
    }

    pub fn get_u8(&mut self) -> Result<u8, ProtocolError> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn get_i16(&mut self) -> Result<i16, ProtocolError> {
        self.ensure(2)?;
        Ok(self.buf.get_i16())
    }

    pub fn get_u16(&mut self) -> Result<u16, ProtocolError> {
        self.ensure(2)?;
        Ok(self.buf.get_u16())
    }

    pub fn get_i32(&mut self) -> Result<i32, ProtocolError> {
        self.ensure(4)?;
        Ok(self.buf.get_i32())
    }

    pub fn get_i64(&mut self) -> Result<i64, ProtocolError> {
        self.ensure(8)?;
        Ok(self.buf.get_i64())
    }

    pub fn get_f32(&mut self) -> Result<f32, ProtocolError> {
        self.ensure(4)?;
        Ok(self.buf.get_f32())
    }

    pub fn get_f64(&mut self) -> Result<f64, ProtocolError> {
        self.ensure(8)?;
        Ok(self.buf.get_f64())
    }

    /// Borrows the next `len` bytes.
    pub fn get_slice(&mut self, len: usize) -> Result<&'a [u8], ProtocolError> {
        self.ensure(len)?;
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    /// Reads a sequence length prefix.
    pub fn get_length(&mut self) -> Result<usize, ProtocolError> {
        let first = self.get_u8()?;
        if first != LONG_LENGTH_MARKER {
            return Ok(first as usize);
        }
        let len = self.get_i32()?;
        usize::try_from(len).map_err(|_| ProtocolError::InvalidLength(len))
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn get_string(&mut self) -> Result<String, ProtocolError> {
        let len = self.get_length()?;
        let bytes = self.get_slice(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| ProtocolError::InvalidUtf8)
    }
}

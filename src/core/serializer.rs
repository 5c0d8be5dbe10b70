//! # Serializer
//!
//! Writes a message into a buffer of exactly `encoded_len(m)` bytes,
//! filling it from the end toward the start in a single pass.
//!
//! Writing back-to-front means a nested message's length is known the moment
//! its last field has been written: it is the distance the write cursor
//! moved. The length prefix and tag are then written in front of it, so no
//! payload is ever copied or the buffer resized.
//!
//! Fields are visited in reverse schema order (and repeated elements in
//! reverse), which leaves the finished stream in schema declaration order.
//! The output is therefore deterministic and safe to hash or sign.

use crate::core::message::Message;
use crate::core::size;
use crate::core::varint;
use crate::core::wire::{self, WireType};
use crate::error::{CodecError, Result};
use bytes::Bytes;

/// Largest message the serializer will produce (2 GiB - 1)
pub const MAX_MESSAGE_LEN: usize = i32::MAX as usize;

/// Back-to-front writer over a buffer sized by the size calculator.
///
/// Every `put_*` call moves the cursor toward the start of the buffer. The
/// caller guarantees the buffer is exactly large enough; running out of room
/// is an implementation defect in the size calculation.
pub struct SizedWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SizedWriter<'a> {
    /// Create a writer positioned at the end of `buf`
    pub fn new(buf: &'a mut [u8]) -> Self {
        let pos = buf.len();
        Self { buf, pos }
    }

    /// Bytes written so far
    #[inline]
    pub fn written(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Bytes still free in front of the cursor
    #[inline]
    pub fn remaining(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn put_u8(&mut self, byte: u8) {
        self.pos -= 1;
        self.buf[self.pos] = byte;
    }

    #[inline]
    pub fn put_slice(&mut self, src: &[u8]) {
        let start = self.pos - src.len();
        self.buf[start..self.pos].copy_from_slice(src);
        self.pos = start;
    }

    #[inline]
    pub fn put_varint(&mut self, value: u64) {
        let start = self.pos - varint::encoded_len(value);
        varint::encode_into(value, &mut self.buf[start..self.pos]);
        self.pos = start;
    }

    #[inline]
    pub fn put_fixed32(&mut self, value: u32) {
        self.put_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn put_fixed64(&mut self, value: u64) {
        self.put_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn put_tag(&mut self, field_number: u32, wire_type: WireType) {
        self.put_varint(wire::make_tag(field_number, wire_type));
    }

    /// Write the length prefix for the `len` bytes most recently written
    #[inline]
    pub fn put_length(&mut self, len: usize) {
        self.put_varint(len as u64);
    }
}

/// Write every field of `msg`, last field first.
pub(crate) fn write_message<M: Message>(msg: &M, w: &mut SizedWriter<'_>) {
    // Retained unknown fields trail the known ones
    if let Some(unknown) = msg.unknown_fields() {
        w.put_slice(unknown.as_bytes());
    }
    for field in M::schema().fields().iter().rev() {
        field.write(msg, w);
    }
}

/// Write `msg` as a length-delimited field: payload, length, tag.
pub(crate) fn write_nested<N: Message>(msg: &N, field_number: u32, w: &mut SizedWriter<'_>) {
    let end = w.written();
    write_message(msg, w);
    let len = w.written() - end;
    w.put_length(len);
    w.put_tag(field_number, WireType::LengthDelimited);
}

fn checked_len<M: Message>(msg: &M) -> Result<usize> {
    let len = size::encoded_len(msg);
    if len > MAX_MESSAGE_LEN {
        return Err(CodecError::MessageTooLarge {
            size: len,
            limit: MAX_MESSAGE_LEN,
        });
    }
    Ok(len)
}

/// Encode `msg` into the front of `buf`, returning the number of bytes used.
///
/// # Errors
/// - `MessageTooLarge` if the encoding would exceed [`MAX_MESSAGE_LEN`]
/// - `BufferTooSmall` if `buf` cannot hold the encoding
pub fn encode_to_slice<M: Message>(msg: &M, buf: &mut [u8]) -> Result<usize> {
    let len = checked_len(msg)?;
    if buf.len() < len {
        return Err(CodecError::BufferTooSmall {
            needed: len,
            available: buf.len(),
        });
    }

    Ok(write_sized(msg, &mut buf[..len]))
}

/// Encode `msg` into a freshly allocated vector of exactly the right size
pub fn encode_to_vec<M: Message>(msg: &M) -> Result<Vec<u8>> {
    let len = checked_len(msg)?;
    let mut buf = vec![0u8; len];
    write_sized(msg, &mut buf);
    Ok(buf)
}

/// `buf` must be exactly `encoded_len(msg)` bytes long.
pub(crate) fn write_sized<M: Message>(msg: &M, buf: &mut [u8]) -> usize {
    let mut writer = SizedWriter::new(buf);
    write_message(msg, &mut writer);
    debug_assert_eq!(
        writer.remaining(),
        0,
        "size calculation disagrees with serializer for {}",
        M::TYPE_NAME
    );
    writer.written()
}

/// Encode `msg` into an immutable `Bytes` handle
pub fn encode_to_bytes<M: Message>(msg: &M) -> Result<Bytes> {
    encode_to_vec(msg).map(Bytes::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_fills_back_to_front() {
        let mut buf = [0u8; 6];
        let mut w = SizedWriter::new(&mut buf);
        w.put_slice(b"hi");
        assert_eq!(w.written(), 2);
        w.put_length(2);
        w.put_tag(1, WireType::LengthDelimited);
        w.put_varint(300);
        assert_eq!(w.remaining(), 0);
        assert_eq!(buf, [0xAC, 0x02, 0x0A, 0x02, b'h', b'i']);
    }

    #[test]
    fn test_writer_fixed_widths_little_endian() {
        let mut buf = [0u8; 12];
        let mut w = SizedWriter::new(&mut buf);
        w.put_fixed64(0x0102_0304_0506_0708);
        w.put_fixed32(0x0A0B_0C0D);
        assert_eq!(w.remaining(), 0);
        assert_eq!(
            buf,
            [0x0D, 0x0C, 0x0B, 0x0A, 0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]
        );
    }

    #[test]
    fn test_writer_single_byte() {
        let mut buf = [0u8; 2];
        let mut w = SizedWriter::new(&mut buf);
        w.put_u8(0x02);
        w.put_u8(0x01);
        assert_eq!(buf, [0x01, 0x02]);
    }
}

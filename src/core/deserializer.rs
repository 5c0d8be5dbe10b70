//! # Deserializer
//!
//! Forward, streaming parser over attacker-controlled bytes.
//!
//! The parser reads one tag at a time, dispatches known fields to their
//! schema descriptor and skips everything else according to its wire type.
//! Every length taken from the wire is checked against the remaining input
//! before a slice is formed, so malformed input surfaces as an error and
//! never as an out-of-bounds read.
//!
//! ## Error Policy
//! - A known field carrying the wrong wire type is rejected
//!   (`FieldTypeMismatch`) instead of being skipped
//! - Any error aborts the whole decode; the partially built message is dropped
//!
//! ## Group Skipping
//! Legacy groups are skipped with a depth counter rather than recursion:
//! `StartGroup` increments it, `EndGroup` decrements it, and an `EndGroup`
//! seen at depth zero is `UnmatchedEndOfGroup`.

use crate::config::DecodeConfig;
use crate::core::message::Message;
use crate::core::varint;
use crate::core::wire::{self, WireType};
use crate::error::{CodecError, Result};
use tracing::{debug, trace};

/// Cursor over an input slice with bounds-checked reads
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Offset of the next unread byte
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    #[inline]
    pub fn read_varint(&mut self) -> Result<u64> {
        let (value, pos) = varint::decode(self.buf, self.pos)?;
        self.pos = pos;
        Ok(value)
    }

    /// Read a tag and split it into field number and wire type
    #[inline]
    pub fn read_tag(&mut self) -> Result<(u32, WireType)> {
        wire::split_tag(self.read_varint()?)
    }

    /// Take the next `len` bytes.
    ///
    /// # Errors
    /// `UnexpectedEndOfInput` if fewer than `len` bytes remain
    #[inline]
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(CodecError::UnexpectedEndOfInput);
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_fixed32(&mut self) -> Result<u32> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn read_fixed64(&mut self) -> Result<u64> {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(bytes))
    }

    /// Read a length prefix.
    ///
    /// # Errors
    /// `InvalidLength` if the value would be negative as a signed size
    pub fn read_length(&mut self) -> Result<usize> {
        let len = self.read_varint()?;
        if len > isize::MAX as u64 {
            return Err(CodecError::InvalidLength);
        }
        Ok(len as usize)
    }

    /// Read a length prefix and the payload it announces
    pub fn read_length_delimited(&mut self) -> Result<&'a [u8]> {
        let len = self.read_length()?;
        self.take(len)
    }

    /// Skip the payload of a field whose tag has already been read
    pub fn skip_field(&mut self, wire_type: WireType) -> Result<()> {
        match wire_type {
            WireType::Varint => {
                self.read_varint()?;
            }
            WireType::Fixed64 => {
                self.take(8)?;
            }
            WireType::Fixed32 => {
                self.take(4)?;
            }
            WireType::LengthDelimited => {
                self.read_length_delimited()?;
            }
            WireType::StartGroup => self.skip_group()?,
            WireType::EndGroup => return Err(CodecError::UnmatchedEndOfGroup),
        }
        Ok(())
    }

    fn skip_group(&mut self) -> Result<()> {
        let mut depth: usize = 1;
        while depth > 0 {
            if self.is_empty() {
                return Err(CodecError::UnexpectedEndOfInput);
            }
            let (_, wire_type) = self.read_tag()?;
            match wire_type {
                WireType::StartGroup => depth += 1,
                WireType::EndGroup => depth -= 1,
                other => self.skip_field(other)?,
            }
        }
        Ok(())
    }

    /// Bytes consumed since offset `start`
    #[inline]
    pub(crate) fn consumed_since(&self, start: usize) -> &'a [u8] {
        &self.buf[start..self.pos]
    }
}

/// Remaining nesting budget for one decode call
#[derive(Debug, Clone, Copy)]
pub(crate) struct DecodeContext {
    depth_remaining: u32,
    limit: u32,
}

impl DecodeContext {
    pub(crate) fn new(config: &DecodeConfig) -> Self {
        Self {
            depth_remaining: config.recursion_limit,
            limit: config.recursion_limit,
        }
    }

    /// Descend one level into a nested message
    pub(crate) fn enter(self) -> Result<Self> {
        if self.depth_remaining == 0 {
            return Err(CodecError::RecursionLimitExceeded(self.limit));
        }
        Ok(Self {
            depth_remaining: self.depth_remaining - 1,
            limit: self.limit,
        })
    }
}

/// Merge every field in `buf` into `msg`.
pub(crate) fn merge_message<M: Message>(
    msg: &mut M,
    buf: &[u8],
    ctx: DecodeContext,
) -> Result<()> {
    let schema = M::schema();
    let mut reader = Reader::new(buf);

    while !reader.is_empty() {
        let start = reader.position();
        let (number, wire_type) = reader.read_tag()?;
        if wire_type == WireType::EndGroup {
            return Err(CodecError::UnmatchedEndOfGroup);
        }

        match schema.field(number) {
            Some(field) => {
                if !field.accepts(wire_type) {
                    return Err(CodecError::FieldTypeMismatch {
                        message: M::TYPE_NAME,
                        field: number,
                        expected: field.wire_type(),
                        found: wire_type,
                    });
                }
                field.merge(msg, wire_type, &mut reader, ctx)?;
            }
            None => {
                reader.skip_field(wire_type)?;
                trace!(
                    message = M::TYPE_NAME,
                    field = number,
                    wire_type = %wire_type,
                    "Skipped unknown field"
                );
                if let Some(unknown) = msg.unknown_fields_mut() {
                    unknown.push_raw(reader.consumed_since(start));
                }
            }
        }
    }

    Ok(())
}

/// Merge a length-delimited nested message into `msg`
pub(crate) fn merge_nested<N: Message>(
    msg: &mut N,
    reader: &mut Reader<'_>,
    ctx: DecodeContext,
) -> Result<()> {
    let payload = reader.read_length_delimited()?;
    merge_message(msg, payload, ctx.enter()?)
}

/// Decode a message using the default limits
pub fn decode<M: Message>(buf: &[u8]) -> Result<M> {
    decode_with(buf, &DecodeConfig::default())
}

/// Decode a message under explicit limits.
///
/// # Errors
/// - `MessageTooLarge` if `buf` exceeds `config.max_message_size`
/// - any framing or structure error found in `buf`
pub fn decode_with<M: Message>(buf: &[u8], config: &DecodeConfig) -> Result<M> {
    if buf.len() > config.max_message_size {
        debug!(
            message = M::TYPE_NAME,
            size = buf.len(),
            limit = config.max_message_size,
            "Rejected oversized input"
        );
        return Err(CodecError::MessageTooLarge {
            size: buf.len(),
            limit: config.max_message_size,
        });
    }

    let mut msg = M::default();
    match merge_message(&mut msg, buf, DecodeContext::new(config)) {
        Ok(()) => Ok(msg),
        Err(e) => {
            debug!(message = M::TYPE_NAME, size = buf.len(), error = %e, "Decode failed");
            Err(e)
        }
    }
}

//! # Size Calculator
//!
//! Computes the exact encoded length of a message without writing a byte.
//!
//! The serializer allocates exactly this many bytes and fills them
//! back-to-front, so `encoded_len(m) == encode_to_vec(m)?.len()` must hold
//! for every message; the property tests pin that law down.
//!
//! Sums saturate: a message whose size cannot be represented ends up at
//! `usize::MAX`, which the serializer rejects as `MessageTooLarge`.

use crate::core::message::Message;
use crate::core::varint;
use crate::core::wire;

/// Exact number of bytes `msg` encodes to
pub fn encoded_len<M: Message>(msg: &M) -> usize {
    let known = M::schema()
        .fields()
        .iter()
        .fold(0usize, |acc, field| acc.saturating_add(field.encoded_len(msg)));
    let unknown = msg.unknown_fields().map_or(0, |u| u.len());
    known.saturating_add(unknown)
}

/// Cost of one field whose payload (length prefix included) is `payload_len`
#[inline]
pub(crate) fn field_len(field_number: u32, payload_len: usize) -> usize {
    wire::tag_len(field_number).saturating_add(payload_len)
}

/// Cost of a length prefix followed by `len` bytes
#[inline]
pub(crate) fn delimited_len(len: usize) -> usize {
    varint::encoded_len(len as u64).saturating_add(len)
}

/// Cost of `msg` embedded as a length-delimited field
#[inline]
pub(crate) fn nested_len<N: Message>(field_number: u32, msg: &N) -> usize {
    field_len(field_number, delimited_len(encoded_len(msg)))
}

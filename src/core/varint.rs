//! # Varint Codec
//!
//! Base-128 variable-length integers: 7 payload bits per byte, low groups
//! first, with the high bit (`0x80`) set on every byte except the last.
//!
//! Signed values that are expected to be small in magnitude are mapped onto
//! the unsigned space with zig-zag encoding first, so `-1` costs one byte
//! instead of ten.
//!
//! ## Usage
//! ```rust
//! use zktx_codec::core::varint;
//!
//! let mut buf = Vec::new();
//! varint::encode(300, &mut buf);
//! assert_eq!(buf, [0xAC, 0x02]);
//!
//! let (value, cursor) = varint::decode(&buf, 0).unwrap();
//! assert_eq!((value, cursor), (300, 2));
//! ```

use crate::error::{CodecError, Result};
use bytes::BufMut;

/// Longest possible encoding of a `u64`
pub const MAX_VARINT_LEN: usize = 10;

/// Number of bytes `value` occupies once varint-encoded
#[inline]
pub fn encoded_len(value: u64) -> usize {
    // bits(x | 1) keeps zero at one group
    ((64 - (value | 1).leading_zeros() as usize) + 6) / 7
}

/// Append the varint encoding of `value` to `buf`
#[inline]
pub fn encode<B: BufMut>(mut value: u64, buf: &mut B) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Write the varint encoding of `value` at the front of `dst`.
///
/// `dst` must be at least `encoded_len(value)` bytes long; returns the count
/// of bytes written.
#[inline]
pub(crate) fn encode_into(mut value: u64, dst: &mut [u8]) -> usize {
    let mut i = 0;
    while value >= 0x80 {
        dst[i] = (value as u8 & 0x7F) | 0x80;
        value >>= 7;
        i += 1;
    }
    dst[i] = value as u8;
    i + 1
}

/// Decode one varint starting at `cursor`.
///
/// Returns the value and the cursor positioned just past the final byte.
///
/// # Errors
/// - `IntegerOverflow` if no terminating byte appears within 64 bits of shift
/// - `UnexpectedEndOfInput` if `buf` ends before a terminating byte
#[inline]
pub fn decode(buf: &[u8], cursor: usize) -> Result<(u64, usize)> {
    let mut value: u64 = 0;
    let mut pos = cursor;
    let mut shift: u32 = 0;
    loop {
        if shift >= 64 {
            return Err(CodecError::IntegerOverflow);
        }
        let byte = *buf.get(pos).ok_or(CodecError::UnexpectedEndOfInput)?;
        pos += 1;
        value |= u64::from(byte & 0x7F) << shift;
        if byte < 0x80 {
            return Ok((value, pos));
        }
        shift += 7;
    }
}

/// Map a signed 64-bit integer onto the unsigned varint space
#[inline]
pub fn zigzag_encode_64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode_64`]
#[inline]
pub fn zigzag_decode_64(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Map a signed 32-bit integer onto the unsigned varint space
#[inline]
pub fn zigzag_encode_32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Inverse of [`zigzag_encode_32`]
#[inline]
pub fn zigzag_decode_32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn encoded(value: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        encode(value, &mut buf);
        buf
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(encoded(0), [0x00]);
        assert_eq!(encoded(1), [0x01]);
        assert_eq!(encoded(127), [0x7F]);
        assert_eq!(encoded(128), [0x80, 0x01]);
        assert_eq!(encoded(300), [0xAC, 0x02]);
        assert_eq!(encoded(16_384), [0x80, 0x80, 0x01]);
        assert_eq!(
            encoded(u64::MAX),
            [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]
        );
    }

    #[test]
    fn test_encoded_len_matches_encoding() {
        for shift in 0..64 {
            for value in [1u64 << shift, (1u64 << shift) - 1, (1u64 << shift) + 1] {
                assert_eq!(encoded_len(value), encoded(value).len(), "value {value}");
            }
        }
        assert_eq!(encoded_len(0), 1);
        assert_eq!(encoded_len(u64::MAX), MAX_VARINT_LEN);
    }

    #[test]
    fn test_encode_into_matches_encode() {
        let mut dst = [0u8; MAX_VARINT_LEN];
        for value in [0, 1, 300, u32::MAX as u64, u64::MAX] {
            let n = encode_into(value, &mut dst);
            assert_eq!(&dst[..n], encoded(value).as_slice());
        }
    }

    #[test]
    fn test_decode_advances_cursor() {
        let buf = [0xFF, 0xAC, 0x02, 0x05];
        let (value, cursor) = decode(&buf, 1).unwrap();
        assert_eq!(value, 300);
        assert_eq!(cursor, 3);
        let (value, cursor) = decode(&buf, cursor).unwrap();
        assert_eq!(value, 5);
        assert_eq!(cursor, 4);
    }

    #[test]
    fn test_decode_truncated() {
        assert!(matches!(
            decode(&[0x80, 0x80], 0),
            Err(CodecError::UnexpectedEndOfInput)
        ));
        assert!(matches!(decode(&[], 0), Err(CodecError::UnexpectedEndOfInput)));
        assert!(matches!(decode(&[0x01], 1), Err(CodecError::UnexpectedEndOfInput)));
    }

    #[test]
    fn test_decode_overflow() {
        let buf = [0xFF; 11];
        assert!(matches!(decode(&buf, 0), Err(CodecError::IntegerOverflow)));

        // Ten continuation bytes followed by a terminator still overflow
        let mut buf = vec![0x80; 10];
        buf.push(0x01);
        assert!(matches!(decode(&buf, 0), Err(CodecError::IntegerOverflow)));
    }

    #[test]
    fn test_decode_tenth_byte_high_bits_discarded() {
        let buf = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F];
        let (value, cursor) = decode(&buf, 0).unwrap();
        assert_eq!(value, u64::MAX);
        assert_eq!(cursor, 10);
    }

    #[test]
    fn test_zigzag() {
        let pairs: [(i64, u64); 6] = [
            (0, 0),
            (-1, 1),
            (1, 2),
            (-2, 3),
            (i64::MAX, u64::MAX - 1),
            (i64::MIN, u64::MAX),
        ];
        for (signed, unsigned) in pairs {
            assert_eq!(zigzag_encode_64(signed), unsigned);
            assert_eq!(zigzag_decode_64(unsigned), signed);
        }

        assert_eq!(zigzag_encode_32(-1), 1);
        assert_eq!(zigzag_encode_32(i32::MIN), u32::MAX);
        assert_eq!(zigzag_decode_32(u32::MAX - 1), i32::MAX);
    }
}

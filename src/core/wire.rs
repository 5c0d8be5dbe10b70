//! Wire types and field tags.

use crate::core::varint;
use crate::error::{CodecError, Result};
use std::fmt;

/// Largest field number a tag can carry (2^29 - 1)
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// How a field's payload is framed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    /// Base-128 varint
    Varint = 0,
    /// Eight little-endian bytes
    Fixed64 = 1,
    /// Varint length followed by that many bytes
    LengthDelimited = 2,
    /// Legacy group start; only ever skipped
    StartGroup = 3,
    /// Legacy group end; only ever skipped
    EndGroup = 4,
    /// Four little-endian bytes
    Fixed32 = 5,
}

impl WireType {
    /// Parse the low three bits of a tag
    pub fn from_bits(bits: u8) -> Result<Self> {
        match bits {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            3 => Ok(WireType::StartGroup),
            4 => Ok(WireType::EndGroup),
            5 => Ok(WireType::Fixed32),
            other => Err(CodecError::MalformedWireType(other)),
        }
    }

    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            WireType::Varint => "varint",
            WireType::Fixed64 => "fixed64",
            WireType::LengthDelimited => "length-delimited",
            WireType::StartGroup => "start-group",
            WireType::EndGroup => "end-group",
            WireType::Fixed32 => "fixed32",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pack a field number and wire type into a tag value
#[inline]
pub fn make_tag(field_number: u32, wire_type: WireType) -> u64 {
    (u64::from(field_number) << 3) | wire_type as u64
}

/// Split a decoded tag value into field number and wire type.
///
/// # Errors
/// - `MalformedWireType` for wire types 6 and 7
/// - `InvalidFieldNumber` for field number 0 or above [`MAX_FIELD_NUMBER`]
#[inline]
pub fn split_tag(tag: u64) -> Result<(u32, WireType)> {
    let wire_type = WireType::from_bits((tag & 0x7) as u8)?;
    let number = tag >> 3;
    if number == 0 || number > u64::from(MAX_FIELD_NUMBER) {
        return Err(CodecError::InvalidFieldNumber(number));
    }
    Ok((number as u32, wire_type))
}

/// Encoded length of the tag for `field_number`; independent of wire type
#[inline]
pub fn tag_len(field_number: u32) -> usize {
    varint::encoded_len(u64::from(field_number) << 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::expect_used)]
    fn test_wire_type_bits_roundtrip() {
        for bits in 0..=5u8 {
            let wire_type = WireType::from_bits(bits).expect("valid wire type");
            assert_eq!(wire_type as u8, bits);
        }
        assert!(matches!(
            WireType::from_bits(6),
            Err(CodecError::MalformedWireType(6))
        ));
        assert!(matches!(
            WireType::from_bits(7),
            Err(CodecError::MalformedWireType(7))
        ));
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_tag_packing() {
        assert_eq!(make_tag(1, WireType::Varint), 0x08);
        assert_eq!(make_tag(1, WireType::LengthDelimited), 0x0A);
        assert_eq!(make_tag(2, WireType::LengthDelimited), 0x12);

        let (number, wire_type) = split_tag(0x12).expect("valid tag");
        assert_eq!(number, 2);
        assert_eq!(wire_type, WireType::LengthDelimited);
    }

    #[test]
    fn test_split_tag_rejects_bad_numbers() {
        assert!(matches!(split_tag(0x00), Err(CodecError::InvalidFieldNumber(0))));
        let too_big = (u64::from(MAX_FIELD_NUMBER) + 1) << 3;
        assert!(matches!(
            split_tag(too_big),
            Err(CodecError::InvalidFieldNumber(_))
        ));
    }

    #[test]
    fn test_tag_len() {
        assert_eq!(tag_len(1), 1);
        assert_eq!(tag_len(15), 1);
        assert_eq!(tag_len(16), 2);
        assert_eq!(tag_len(2047), 2);
        assert_eq!(tag_len(2048), 3);
        assert_eq!(tag_len(MAX_FIELD_NUMBER), 5);
    }
}

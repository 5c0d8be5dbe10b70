//! # Scalar Codecs
//!
//! Payload rules for every protobuf scalar type.
//!
//! Each type is a zero-sized marker implementing [`ScalarCodec`]; schemas
//! pick one per field (`builder.scalar::<UInt64>(…)`), which keeps the
//! engines generic while the Rust field keeps its natural type.
//!
//! | Marker     | Rust type | Wire type         | Notes                          |
//! |------------|-----------|-------------------|--------------------------------|
//! | `UInt64`   | `u64`     | varint            |                                |
//! | `UInt32`   | `u32`     | varint            | upper bits truncated on decode |
//! | `Int64`    | `i64`     | varint            | two's complement, 10 bytes < 0 |
//! | `Int32`    | `i32`     | varint            | sign-extended to 64 bits       |
//! | `SInt64`   | `i64`     | varint            | zig-zag                        |
//! | `SInt32`   | `i32`     | varint            | zig-zag                        |
//! | `Bool`     | `bool`    | varint            | any nonzero decodes as `true`  |
//! | `Fixed64`  | `u64`     | fixed64           |                                |
//! | `SFixed64` | `i64`     | fixed64           |                                |
//! | `Double`   | `f64`     | fixed64           |                                |
//! | `Fixed32`  | `u32`     | fixed32           |                                |
//! | `SFixed32` | `i32`     | fixed32           |                                |
//! | `Float`    | `f32`     | fixed32           |                                |
//! | `Str`      | `String`  | length-delimited  | UTF-8 validated                |
//! | `Bytes`    | `Vec<u8>` | length-delimited  |                                |

use crate::core::deserializer::Reader;
use crate::core::serializer::SizedWriter;
use crate::core::size;
use crate::core::varint;
use crate::core::wire::WireType;
use crate::error::Result;
use std::fmt::Debug;

/// Encoding rules for one scalar type
pub trait ScalarCodec: Send + Sync + 'static {
    /// Rust representation of the field
    type Value: Default + Clone + PartialEq + Debug + Send + Sync + 'static;

    /// Wire type the value is framed with
    const WIRE_TYPE: WireType;

    /// Protobuf type name, used in schema summaries
    const NAME: &'static str;

    /// Zero values are elided from the wire
    fn is_default(value: &Self::Value) -> bool;

    /// Encoded payload length, length prefix included
    fn payload_len(value: &Self::Value) -> usize;

    /// Write the payload (and its length prefix) back-to-front
    fn write(value: &Self::Value, w: &mut SizedWriter<'_>);

    /// Read one payload
    fn read(r: &mut Reader<'_>) -> Result<Self::Value>;

    /// Numeric types also accept the packed repeated encoding
    fn packable() -> bool {
        Self::WIRE_TYPE != WireType::LengthDelimited
    }
}

macro_rules! varint_scalar {
    ($(#[$doc:meta])* $marker:ident, $ty:ty, $name:literal, |$e:ident| $to_wire:expr, |$d:ident| $from_wire:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $marker;

        impl ScalarCodec for $marker {
            type Value = $ty;
            const WIRE_TYPE: WireType = WireType::Varint;
            const NAME: &'static str = $name;

            #[inline]
            fn is_default(value: &$ty) -> bool {
                *value == <$ty>::default()
            }

            #[inline]
            fn payload_len(value: &$ty) -> usize {
                let $e = *value;
                varint::encoded_len($to_wire)
            }

            #[inline]
            fn write(value: &$ty, w: &mut SizedWriter<'_>) {
                let $e = *value;
                w.put_varint($to_wire);
            }

            #[inline]
            fn read(r: &mut Reader<'_>) -> Result<$ty> {
                let $d = r.read_varint()?;
                Ok($from_wire)
            }
        }
    };
}

varint_scalar!(
    /// `uint64`
    UInt64, u64, "uint64", |v| v, |raw| raw
);
varint_scalar!(
    /// `uint32`
    UInt32, u32, "uint32", |v| u64::from(v), |raw| raw as u32
);
varint_scalar!(
    /// `int64`
    Int64, i64, "int64", |v| v as u64, |raw| raw as i64
);
varint_scalar!(
    /// `int32`
    Int32, i32, "int32", |v| i64::from(v) as u64, |raw| raw as i32
);
varint_scalar!(
    /// `sint64`
    SInt64, i64, "sint64", |v| varint::zigzag_encode_64(v), |raw| varint::zigzag_decode_64(raw)
);
varint_scalar!(
    /// `sint32`
    SInt32, i32, "sint32", |v| u64::from(varint::zigzag_encode_32(v)), |raw| varint::zigzag_decode_32(raw as u32)
);
varint_scalar!(
    /// `bool`
    Bool, bool, "bool", |v| u64::from(v), |raw| raw != 0
);

macro_rules! fixed_scalar {
    ($(#[$doc:meta])* $marker:ident, $ty:ty, $name:literal, $wire:ident, $width:literal, $put:ident, $read:ident, |$e:ident| $to_wire:expr, |$d:ident| $from_wire:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $marker;

        impl ScalarCodec for $marker {
            type Value = $ty;
            const WIRE_TYPE: WireType = WireType::$wire;
            const NAME: &'static str = $name;

            #[inline]
            fn is_default(value: &$ty) -> bool {
                let $e = *value;
                $to_wire == 0
            }

            #[inline]
            fn payload_len(_value: &$ty) -> usize {
                $width
            }

            #[inline]
            fn write(value: &$ty, w: &mut SizedWriter<'_>) {
                let $e = *value;
                w.$put($to_wire);
            }

            #[inline]
            fn read(r: &mut Reader<'_>) -> Result<$ty> {
                let $d = r.$read()?;
                Ok($from_wire)
            }
        }
    };
}

fixed_scalar!(
    /// `fixed64`
    Fixed64, u64, "fixed64", Fixed64, 8, put_fixed64, read_fixed64, |v| v, |raw| raw
);
fixed_scalar!(
    /// `sfixed64`
    SFixed64, i64, "sfixed64", Fixed64, 8, put_fixed64, read_fixed64, |v| v as u64, |raw| raw as i64
);
fixed_scalar!(
    /// `double`; zero is detected on the bit pattern, so `-0.0` is emitted
    Double, f64, "double", Fixed64, 8, put_fixed64, read_fixed64, |v| v.to_bits(), |raw| f64::from_bits(raw)
);
fixed_scalar!(
    /// `fixed32`
    Fixed32, u32, "fixed32", Fixed32, 4, put_fixed32, read_fixed32, |v| v, |raw| raw
);
fixed_scalar!(
    /// `sfixed32`
    SFixed32, i32, "sfixed32", Fixed32, 4, put_fixed32, read_fixed32, |v| v as u32, |raw| raw as i32
);
fixed_scalar!(
    /// `float`; zero is detected on the bit pattern, so `-0.0` is emitted
    Float, f32, "float", Fixed32, 4, put_fixed32, read_fixed32, |v| v.to_bits(), |raw| f32::from_bits(raw)
);

/// `string`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Str;

impl ScalarCodec for Str {
    type Value = String;
    const WIRE_TYPE: WireType = WireType::LengthDelimited;
    const NAME: &'static str = "string";

    #[inline]
    fn is_default(value: &String) -> bool {
        value.is_empty()
    }

    #[inline]
    fn payload_len(value: &String) -> usize {
        size::delimited_len(value.len())
    }

    #[inline]
    fn write(value: &String, w: &mut SizedWriter<'_>) {
        w.put_slice(value.as_bytes());
        w.put_length(value.len());
    }

    fn read(r: &mut Reader<'_>) -> Result<String> {
        let raw = r.read_length_delimited()?;
        Ok(std::str::from_utf8(raw)?.to_owned())
    }
}

/// `bytes`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bytes;

impl ScalarCodec for Bytes {
    type Value = Vec<u8>;
    const WIRE_TYPE: WireType = WireType::LengthDelimited;
    const NAME: &'static str = "bytes";

    #[inline]
    fn is_default(value: &Vec<u8>) -> bool {
        value.is_empty()
    }

    #[inline]
    fn payload_len(value: &Vec<u8>) -> usize {
        size::delimited_len(value.len())
    }

    #[inline]
    fn write(value: &Vec<u8>, w: &mut SizedWriter<'_>) {
        w.put_slice(value);
        w.put_length(value.len());
    }

    fn read(r: &mut Reader<'_>) -> Result<Vec<u8>> {
        Ok(r.read_length_delimited()?.to_vec())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::CodecError;

    fn encode<S: ScalarCodec>(value: &S::Value) -> Vec<u8> {
        let mut buf = vec![0u8; S::payload_len(value)];
        let mut w = SizedWriter::new(&mut buf);
        S::write(value, &mut w);
        assert_eq!(w.remaining(), 0, "{} payload_len disagrees with write", S::NAME);
        buf
    }

    fn roundtrip<S: ScalarCodec>(value: S::Value) {
        let buf = encode::<S>(&value);
        let mut r = Reader::new(&buf);
        let decoded = S::read(&mut r).expect("decode");
        assert!(r.is_empty());
        assert_eq!(decoded, value, "{}", S::NAME);
    }

    #[test]
    fn test_varint_scalars() {
        assert_eq!(encode::<UInt64>(&300), [0xAC, 0x02]);
        assert_eq!(encode::<Bool>(&true), [0x01]);
        assert_eq!(encode::<SInt64>(&-1), [0x01]);
        assert_eq!(encode::<SInt32>(&-2), [0x03]);
        // Negative int32 is sign-extended to ten bytes
        assert_eq!(encode::<Int32>(&-1).len(), 10);
        assert_eq!(encode::<Int64>(&-1).len(), 10);

        roundtrip::<UInt64>(u64::MAX);
        roundtrip::<UInt32>(u32::MAX);
        roundtrip::<Int64>(i64::MIN);
        roundtrip::<Int32>(i32::MIN);
        roundtrip::<SInt64>(i64::MIN);
        roundtrip::<SInt32>(i32::MAX);
        roundtrip::<Bool>(true);
    }

    #[test]
    fn test_fixed_scalars() {
        assert_eq!(encode::<Fixed32>(&1), [1, 0, 0, 0]);
        assert_eq!(encode::<Double>(&1.5).len(), 8);

        roundtrip::<Fixed64>(u64::MAX);
        roundtrip::<SFixed64>(-7);
        roundtrip::<Fixed32>(0xDEAD_BEEF);
        roundtrip::<SFixed32>(i32::MIN);
        roundtrip::<Double>(-2.25);
        roundtrip::<Float>(3.5);
    }

    #[test]
    fn test_length_delimited_scalars() {
        assert_eq!(encode::<Str>(&"hi".to_string()), [0x02, b'h', b'i']);
        assert_eq!(encode::<Bytes>(&vec![0xFF]), [0x01, 0xFF]);

        roundtrip::<Str>("héllo".to_string());
        roundtrip::<Bytes>(vec![0u8; 300]);
    }

    #[test]
    fn test_zero_detection() {
        assert!(UInt64::is_default(&0));
        assert!(!UInt64::is_default(&1));
        assert!(Bool::is_default(&false));
        assert!(Str::is_default(&String::new()));
        assert!(Double::is_default(&0.0));
        assert!(!Double::is_default(&-0.0));
        assert!(!Float::is_default(&-0.0));
    }

    #[test]
    fn test_string_rejects_invalid_utf8() {
        let buf = [0x02, 0xC3, 0x28];
        let mut r = Reader::new(&buf);
        assert!(matches!(Str::read(&mut r), Err(CodecError::InvalidUtf8(_))));
    }

    #[test]
    fn test_uint32_truncates_wide_varint() {
        let mut buf = Vec::new();
        varint::encode(u64::from(u32::MAX) + 2, &mut buf);
        let mut r = Reader::new(&buf);
        assert_eq!(UInt32::read(&mut r).expect("decode"), 1);
    }

    #[test]
    fn test_packable() {
        assert!(UInt64::packable());
        assert!(Fixed32::packable());
        assert!(!Str::packable());
        assert!(!Bytes::packable());
    }
}

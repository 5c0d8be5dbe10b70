//! Property-based tests using proptest
//!
//! These tests check the codec laws over randomly generated messages and
//! arbitrary byte strings: round trip, exact sizing, and panic freedom.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::Scalars;
use proptest::prelude::*;
use zktx_codec::core::varint;
use zktx_codec::messages::{
    Counter, PageRequest, PageResponse, QueryCounterRequest, QueryCountersRequest,
    QueryCountersResponse, QueryParamsResponse,
};
use zktx_codec::{CodecError, Message};

fn page_request() -> impl Strategy<Value = PageRequest> {
    (
        prop::collection::vec(any::<u8>(), 0..32),
        any::<u64>(),
        any::<u64>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(key, offset, limit, count_total, reverse)| PageRequest {
            key,
            offset,
            limit,
            count_total,
            reverse,
        })
}

fn counter() -> impl Strategy<Value = Counter> {
    ("\\PC{0,24}", any::<u64>()).prop_map(|(address, count)| Counter {
        address,
        count,
        ..Counter::default()
    })
}

fn counters_response() -> impl Strategy<Value = QueryCountersResponse> {
    (
        prop::collection::vec(counter(), 0..8),
        prop::option::of(
            (prop::collection::vec(any::<u8>(), 0..16), any::<u64>())
                .prop_map(|(next_key, total)| PageResponse { next_key, total }),
        ),
    )
        .prop_map(|(counters, pagination)| QueryCountersResponse {
            counters,
            pagination,
        })
}

fn scalars_leaf() -> impl Strategy<Value = Scalars> {
    (
        (
            any::<u64>(),
            any::<u32>(),
            any::<i64>(),
            any::<i32>(),
            any::<i64>(),
            any::<i32>(),
            any::<bool>(),
            any::<u64>(),
        ),
        (
            any::<i64>(),
            -1.0e12f64..1.0e12,
            any::<u32>(),
            any::<i32>(),
            -1.0e6f32..1.0e6,
            "\\PC{0,16}",
            prop::collection::vec(any::<u8>(), 0..16),
        ),
        (
            prop::collection::vec(any::<u32>(), 0..8),
            prop::collection::vec("[a-z]{0,6}", 0..4),
        ),
    )
        .prop_map(
            |(
                (u64_, u32_, i64_, i32_, s64, s32, flag, f64_),
                (sf64, double, f32_, sf32, float, text, blob),
                (ids, tags),
            )| Scalars {
                u64_,
                u32_,
                i64_,
                i32_,
                s64,
                s32,
                flag,
                f64_,
                sf64,
                double,
                f32_,
                sf32,
                float,
                text,
                blob,
                ids,
                tags,
                child: None,
            },
        )
}

fn scalars() -> impl Strategy<Value = Scalars> {
    scalars_leaf().prop_recursive(4, 16, 1, |inner| {
        (scalars_leaf(), inner).prop_map(|(mut outer, child)| {
            outer.child = Some(Box::new(child));
            outer
        })
    })
}

// Property: decode(encode(m)) == m
proptest! {
    #[test]
    fn prop_scalars_roundtrip(msg in scalars()) {
        let bytes = msg.encode_to_vec().expect("encode");
        prop_assert_eq!(Scalars::decode(&bytes).expect("decode"), msg);
    }

    #[test]
    fn prop_counters_response_roundtrip(msg in counters_response()) {
        let bytes = msg.encode_to_vec().expect("encode");
        prop_assert_eq!(QueryCountersResponse::decode(&bytes).expect("decode"), msg);
    }

    #[test]
    fn prop_counters_request_roundtrip(pagination in prop::option::of(page_request())) {
        let msg = QueryCountersRequest { pagination };
        let bytes = msg.encode_to_vec().expect("encode");
        prop_assert_eq!(QueryCountersRequest::decode(&bytes).expect("decode"), msg);
    }
}

// Property: encoded_len is exact
proptest! {
    #[test]
    fn prop_size_law_scalars(msg in scalars()) {
        prop_assert_eq!(msg.encode_to_vec().expect("encode").len(), msg.encoded_len());
    }

    #[test]
    fn prop_size_law_counters(msg in counters_response()) {
        prop_assert_eq!(msg.encode_to_vec().expect("encode").len(), msg.encoded_len());
    }
}

// Property: encoding is deterministic and slice/vec agree
proptest! {
    #[test]
    fn prop_encode_to_slice_matches_vec(msg in counters_response(), slack in 0usize..8) {
        let expected = msg.encode_to_vec().expect("encode");
        let mut buf = vec![0u8; expected.len() + slack];
        let written = msg.encode_to_slice(&mut buf).expect("encode");
        prop_assert_eq!(written, expected.len());
        prop_assert_eq!(&buf[..written], &expected[..]);
    }
}

// Property: varint encoding round trips and matches the size helper
proptest! {
    #[test]
    fn prop_varint_roundtrip(value in any::<u64>()) {
        let mut buf = Vec::new();
        varint::encode(value, &mut buf);
        prop_assert_eq!(buf.len(), varint::encoded_len(value));
        prop_assert_eq!(varint::decode(&buf, 0).expect("decode"), (value, buf.len()));
    }

    #[test]
    fn prop_zigzag_roundtrip(value in any::<i64>(), small in any::<i32>()) {
        prop_assert_eq!(varint::zigzag_decode_64(varint::zigzag_encode_64(value)), value);
        prop_assert_eq!(varint::zigzag_decode_32(varint::zigzag_encode_32(small)), small);
    }
}

// Property: truncating inside a length-delimited payload is always detected
proptest! {
    #[test]
    fn prop_truncated_string_detected(address in "[a-z]{1,40}", keep in 0usize..40) {
        let msg = QueryCounterRequest { address };
        let bytes = msg.encode_to_vec().expect("encode");
        // Header is tag + one-byte length; cut strictly inside the payload
        let cut = 2 + keep % (bytes.len() - 2);
        prop_assert!(matches!(
            QueryCounterRequest::decode(&bytes[..cut]),
            Err(CodecError::UnexpectedEndOfInput)
        ));
    }
}

// Property: arbitrary bytes never panic
proptest! {
    #[test]
    fn prop_arbitrary_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = Scalars::decode(&data);
        let _ = QueryCountersResponse::decode(&data);
        let _ = QueryParamsResponse::decode(&data);
        let _ = Counter::decode(&data);
    }

    #[test]
    fn prop_decoded_garbage_reencodes(data in prop::collection::vec(any::<u8>(), 0..256)) {
        // Whatever decodes must encode again with an exact size
        if let Ok(msg) = QueryCountersResponse::decode(&data) {
            let bytes = msg.encode_to_vec().expect("encode");
            prop_assert_eq!(bytes.len(), msg.encoded_len());
            prop_assert_eq!(QueryCountersResponse::decode(&bytes).expect("decode"), msg);
        }
    }
}

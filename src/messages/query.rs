//! Query service messages for the `hyle.hyle.zktx.v1` counter module

use super::pagination::{PageRequest, PageResponse};
use crate::core::message::{Message, UnknownFields};
use crate::core::scalar::{Str, UInt64};
use crate::core::schema::Schema;
use once_cell::sync::Lazy;

/// Lookup of a single counter by owner address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCounterRequest {
    pub address: String,
}

impl Message for QueryCounterRequest {
    const TYPE_NAME: &'static str = "hyle.hyle.zktx.v1.QueryCounterRequest";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<QueryCounterRequest>> = Lazy::new(|| {
            Schema::<QueryCounterRequest>::builder(QueryCounterRequest::TYPE_NAME)
                .scalar::<Str>(1, "address", |m| &m.address, |m| &mut m.address)
                .build()
        });
        &SCHEMA
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCounterResponse {
    pub counter: u64,
}

impl Message for QueryCounterResponse {
    const TYPE_NAME: &'static str = "hyle.hyle.zktx.v1.QueryCounterResponse";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<QueryCounterResponse>> = Lazy::new(|| {
            Schema::<QueryCounterResponse>::builder(QueryCounterResponse::TYPE_NAME)
                .scalar::<UInt64>(1, "counter", |m| &m.counter, |m| &mut m.counter)
                .build()
        });
        &SCHEMA
    }
}

/// One address and its counter value.
///
/// Fields this build does not know about are kept and written back, so
/// records produced by newer peers survive a decode/encode pass unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counter {
    pub address: String,
    pub count: u64,
    pub unknown: UnknownFields,
}

impl Message for Counter {
    const TYPE_NAME: &'static str = "hyle.hyle.zktx.v1.Counter";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<Counter>> = Lazy::new(|| {
            Schema::<Counter>::builder(Counter::TYPE_NAME)
                .scalar::<Str>(1, "address", |m| &m.address, |m| &mut m.address)
                .scalar::<UInt64>(2, "count", |m| &m.count, |m| &mut m.count)
                .build()
        });
        &SCHEMA
    }

    fn unknown_fields(&self) -> Option<&UnknownFields> {
        Some(&self.unknown)
    }

    fn unknown_fields_mut(&mut self) -> Option<&mut UnknownFields> {
        Some(&mut self.unknown)
    }
}

/// List every counter, one page at a time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCountersRequest {
    pub pagination: Option<PageRequest>,
}

impl Message for QueryCountersRequest {
    const TYPE_NAME: &'static str = "hyle.hyle.zktx.v1.QueryCountersRequest";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<QueryCountersRequest>> = Lazy::new(|| {
            Schema::<QueryCountersRequest>::builder(QueryCountersRequest::TYPE_NAME)
                .message::<PageRequest>(
                    1,
                    "pagination",
                    |m| m.pagination.as_ref(),
                    |m| m.pagination.get_or_insert_with(PageRequest::default),
                )
                .build()
        });
        &SCHEMA
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCountersResponse {
    pub counters: Vec<Counter>,
    pub pagination: Option<PageResponse>,
}

impl Message for QueryCountersResponse {
    const TYPE_NAME: &'static str = "hyle.hyle.zktx.v1.QueryCountersResponse";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<QueryCountersResponse>> = Lazy::new(|| {
            Schema::<QueryCountersResponse>::builder(QueryCountersResponse::TYPE_NAME)
                .repeated_message::<Counter>(1, "counters", |m| &m.counters, |m| &mut m.counters)
                .message::<PageResponse>(
                    2,
                    "pagination",
                    |m| m.pagination.as_ref(),
                    |m| m.pagination.get_or_insert_with(PageResponse::default),
                )
                .build()
        });
        &SCHEMA
    }
}

/// Module parameters; the counter module has none yet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {}

impl Message for Params {
    const TYPE_NAME: &'static str = "hyle.hyle.zktx.v1.Params";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<Params>> =
            Lazy::new(|| Schema::<Params>::builder(Params::TYPE_NAME).build());
        &SCHEMA
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParamsRequest {}

impl Message for QueryParamsRequest {
    const TYPE_NAME: &'static str = "hyle.hyle.zktx.v1.QueryParamsRequest";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<QueryParamsRequest>> = Lazy::new(|| {
            Schema::<QueryParamsRequest>::builder(QueryParamsRequest::TYPE_NAME).build()
        });
        &SCHEMA
    }
}

/// `params` is non-nullable: it is always written, even when empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParamsResponse {
    pub params: Params,
}

impl Message for QueryParamsResponse {
    const TYPE_NAME: &'static str = "hyle.hyle.zktx.v1.QueryParamsResponse";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<QueryParamsResponse>> = Lazy::new(|| {
            Schema::<QueryParamsResponse>::builder(QueryParamsResponse::TYPE_NAME)
                .message::<Params>(1, "params", |m| Some(&m.params), |m| &mut m.params)
                .build()
        });
        &SCHEMA
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_response_300() {
        let msg = QueryCounterResponse { counter: 300 };
        assert_eq!(msg.encode_to_vec().expect("encode"), [0x08, 0xAC, 0x02]);
    }

    #[test]
    fn test_counter_request_address() {
        let msg = QueryCounterRequest {
            address: "bob".into(),
        };
        let bytes = msg.encode_to_vec().expect("encode");
        assert_eq!(bytes, [0x0A, 0x03, b'b', b'o', b'b']);
        assert_eq!(QueryCounterRequest::decode(&bytes).expect("decode"), msg);
    }

    #[test]
    fn test_params_response_always_emits_params() {
        let msg = QueryParamsResponse::default();
        assert_eq!(msg.encoded_len(), 2);
        assert_eq!(msg.encode_to_vec().expect("encode"), [0x0A, 0x00]);
        assert_eq!(QueryParamsResponse::decode(&[]).expect("empty"), msg);
    }

    #[test]
    fn test_absent_pagination_is_omitted() {
        let empty = QueryCountersRequest::default();
        assert!(empty.encode_to_vec().expect("encode").is_empty());

        let with_page = QueryCountersRequest {
            pagination: Some(PageRequest::default()),
        };
        assert_eq!(with_page.encode_to_vec().expect("encode"), [0x0A, 0x00]);
        assert_eq!(
            QueryCountersRequest::decode(&[0x0A, 0x00]).expect("decode"),
            with_page
        );
    }

    #[test]
    fn test_counters_response_nests_elements() {
        let msg = QueryCountersResponse {
            counters: vec![
                Counter {
                    address: "a".into(),
                    count: 1,
                    ..Counter::default()
                },
                Counter {
                    address: "b".into(),
                    count: 2,
                    ..Counter::default()
                },
            ],
            pagination: Some(PageResponse {
                next_key: Vec::new(),
                total: 2,
            }),
        };
        let bytes = msg.encode_to_vec().expect("encode");
        assert_eq!(
            bytes,
            [
                0x0A, 0x05, 0x0A, 0x01, b'a', 0x10, 0x01, // counters[0]
                0x0A, 0x05, 0x0A, 0x01, b'b', 0x10, 0x02, // counters[1]
                0x12, 0x02, 0x10, 0x02, // pagination
            ]
        );
        assert_eq!(QueryCountersResponse::decode(&bytes).expect("decode"), msg);
    }
}

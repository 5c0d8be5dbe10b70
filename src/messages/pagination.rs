//! Cosmos SDK pagination envelopes (`cosmos.base.query.v1beta1`)

use crate::core::message::Message;
use crate::core::scalar::{Bool, Bytes, UInt64};
use crate::core::schema::Schema;
use once_cell::sync::Lazy;

/// Page selector sent with list queries.
///
/// Either `key` or `offset` should be set, not both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Opaque cursor returned as `next_key` by the previous page
    pub key: Vec<u8>,
    pub offset: u64,
    pub limit: u64,
    /// Ask the server to fill `PageResponse::total`
    pub count_total: bool,
    pub reverse: bool,
}

impl Message for PageRequest {
    const TYPE_NAME: &'static str = "cosmos.base.query.v1beta1.PageRequest";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<PageRequest>> = Lazy::new(|| {
            Schema::<PageRequest>::builder(PageRequest::TYPE_NAME)
                .scalar::<Bytes>(1, "key", |m| &m.key, |m| &mut m.key)
                .scalar::<UInt64>(2, "offset", |m| &m.offset, |m| &mut m.offset)
                .scalar::<UInt64>(3, "limit", |m| &m.limit, |m| &mut m.limit)
                .scalar::<Bool>(4, "count_total", |m| &m.count_total, |m| &mut m.count_total)
                .scalar::<Bool>(5, "reverse", |m| &m.reverse, |m| &mut m.reverse)
                .build()
        });
        &SCHEMA
    }
}

/// Page metadata returned with list results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResponse {
    /// Empty when there are no more pages
    pub next_key: Vec<u8>,
    pub total: u64,
}

impl Message for PageResponse {
    const TYPE_NAME: &'static str = "cosmos.base.query.v1beta1.PageResponse";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<PageResponse>> = Lazy::new(|| {
            Schema::<PageResponse>::builder(PageResponse::TYPE_NAME)
                .scalar::<Bytes>(1, "next_key", |m| &m.next_key, |m| &mut m.next_key)
                .scalar::<UInt64>(2, "total", |m| &m.total, |m| &mut m.total)
                .build()
        });
        &SCHEMA
    }
}

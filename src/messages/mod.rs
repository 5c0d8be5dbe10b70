//! # Demonstration Messages
//!
//! Schemas for the `hyle.hyle.zktx.v1` query service and the Cosmos SDK
//! pagination types it embeds.
//!
//! | Type | Fields |
//! |------|--------|
//! | `QueryCounterRequest` | 1 `address` |
//! | `QueryCounterResponse` | 1 `counter` |
//! | `Counter` | 1 `address`, 2 `count` (keeps unknown fields) |
//! | `QueryCountersRequest` | 1 `pagination` |
//! | `QueryCountersResponse` | 1 `counters` (repeated), 2 `pagination` |
//! | `Params`, `QueryParamsRequest` | none |
//! | `QueryParamsResponse` | 1 `params` (always written) |

mod pagination;
mod query;

pub use pagination::{PageRequest, PageResponse};
pub use query::{
    Counter, Params, QueryCounterRequest, QueryCounterResponse, QueryCountersRequest,
    QueryCountersResponse, QueryParamsRequest, QueryParamsResponse,
};

use crate::error::Result;
use crate::registry::SchemaRegistry;

/// Registry holding every type in this module
pub fn zktx_registry() -> Result<SchemaRegistry> {
    Ok(SchemaRegistry::builder()
        .register::<QueryCounterRequest>()?
        .register::<QueryCounterResponse>()?
        .register::<Counter>()?
        .register::<QueryCountersRequest>()?
        .register::<QueryCountersResponse>()?
        .register::<Params>()?
        .register::<QueryParamsRequest>()?
        .register::<QueryParamsResponse>()?
        .register::<PageRequest>()?
        .register::<PageResponse>()?
        .build())
}

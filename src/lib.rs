//! # zktx-codec
//!
//! Schema-driven codec for the protobuf binary wire format.
//!
//! Message types describe their fields once, as data, in a [`Schema`]. Three
//! generic engines walk that schema: one computes the exact encoded size, one
//! fills a buffer of exactly that size back-to-front, and one parses
//! untrusted bytes forward while skipping anything it does not recognize.
//!
//! ## Quick Start
//! ```rust
//! use zktx_codec::messages::QueryCounterResponse;
//! use zktx_codec::Message;
//!
//! let resp = QueryCounterResponse { counter: 300 };
//! let bytes = resp.encode_to_vec()?;
//! assert_eq!(bytes, [0x08, 0xAC, 0x02]);
//! assert_eq!(QueryCounterResponse::decode(&bytes)?, resp);
//! # Ok::<(), zktx_codec::CodecError>(())
//! ```
//!
//! ## Defining a Message
//! ```rust
//! use once_cell::sync::Lazy;
//! use zktx_codec::scalar::{Str, UInt32};
//! use zktx_codec::{Message, Schema};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Greeting {
//!     text: String,
//!     repeat: u32,
//! }
//!
//! impl Message for Greeting {
//!     const TYPE_NAME: &'static str = "demo.Greeting";
//!
//!     fn schema() -> &'static Schema<Self> {
//!         static SCHEMA: Lazy<Schema<Greeting>> = Lazy::new(|| {
//!             Schema::<Greeting>::builder(Greeting::TYPE_NAME)
//!                 .scalar::<Str>(1, "text", |m| &m.text, |m| &mut m.text)
//!                 .scalar::<UInt32>(2, "repeat", |m| &m.repeat, |m| &mut m.repeat)
//!                 .build()
//!         });
//!         &SCHEMA
//!     }
//! }
//!
//! let hi = Greeting { text: "hi".into(), repeat: 2 };
//! assert_eq!(Greeting::decode(&hi.encode_to_vec()?)?, hi);
//! # Ok::<(), zktx_codec::CodecError>(())
//! ```
//!
//! ## Modules
//! - [`core`]: varints, tags, schemas and the encode/decode engines
//! - [`messages`]: `hyle.hyle.zktx.v1` query types and Cosmos pagination
//! - [`registry`]: decode by type name
//! - [`config`]: limits and logging settings, TOML or environment
//! - [`utils`]: logging setup and frame metrics

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod core;
pub mod error;
pub mod messages;
pub mod registry;
pub mod utils;

pub use crate::core::framing::DelimitedCodec;
pub use crate::core::message::{DynMessage, Message, UnknownFields};
pub use crate::core::scalar;
pub use crate::core::schema::{FieldDescriptor, FieldInfo, FieldKind, Schema, SchemaBuilder};
pub use crate::core::wire::WireType;
pub use config::{CodecConfig, DecodeConfig, FramingConfig, LoggingConfig};
pub use error::{CodecError, Result};
pub use registry::SchemaRegistry;

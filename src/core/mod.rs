//! # Core Codec Components
//!
//! Varint framing, schema description, and the three schema-driven engines.
//!
//! This module is the whole wire codec: everything above it (demonstration
//! messages, registry, configuration) only describes types or wires the
//! engines together.
//!
//! ## Components
//! - **Varint**: base-128 integers and zig-zag mapping
//! - **Wire**: wire types and field tags
//! - **Scalar**: per-type payload rules for protobuf scalars
//! - **Schema**: ordered field descriptors per message type
//! - **Size / Serializer / Deserializer**: the schema-agnostic engines
//! - **Framing**: varint length-prefixed message streams for `tokio_util`
//!
//! ## Wire Format
//! ```text
//! field   := tag payload
//! tag     := varint((field_number << 3) | wire_type)
//! payload := varint | fixed64 | varint(len) bytes[len] | fixed32
//! ```
//!
//! ## Security
//! - Every length read from the wire is checked before slicing
//! - Nesting depth and input size are bounded by `DecodeConfig`
//! - Unknown fields, including legacy groups, are skipped without recursion

pub mod deserializer;
pub mod framing;
pub mod message;
pub mod scalar;
pub mod schema;
pub mod serializer;
pub mod size;
pub mod varint;
pub mod wire;

//! # Error Types
//!
//! Error handling for the wire codec.
//!
//! This module defines every failure the codec can report, from malformed
//! varints in attacker-supplied bytes to registry misuse at startup.
//!
//! ## Error Categories
//! - **Framing Errors**: varint overflow, truncated input, impossible lengths
//! - **Structure Errors**: illegal wire types, unmatched groups, type-confused fields
//! - **Limit Errors**: oversized messages, recursion depth, undersized buffers
//! - **Registry Errors**: duplicate or unknown type names, invalid schemas
//! - **I/O Errors**: only surfaced by the stream framing layer
//!
//! Every decode error aborts the whole parse; no partially populated message
//! is ever handed back to the caller.
//!
//! ## Example Usage
//! ```rust
//! use zktx_codec::error::CodecError;
//! use zktx_codec::messages::QueryCounterResponse;
//! use zktx_codec::Message;
//! use tracing::{error, info};
//!
//! match QueryCounterResponse::decode(&[0x08, 0xAC]) {
//!     Ok(msg) => info!(counter = msg.counter, "decoded"),
//!     Err(CodecError::UnexpectedEndOfInput) => error!("truncated response"),
//!     Err(e) => error!(error = %e, "decode failed"),
//! }
//! ```

use crate::core::wire::WireType;
use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Registry errors
    pub const ERR_GLOBAL_REGISTRY_INSTALLED: &str = "Global schema registry already installed";

    /// Logging errors
    pub const ERR_LOGGING_INSTALLED: &str = "A global tracing subscriber is already installed";

    /// Schema errors
    pub const ERR_FIELD_NUMBER_ZERO: &str = "field number must be greater than 0";
    pub const ERR_FIELD_NUMBER_RANGE: &str = "field number exceeds 2^29 - 1";
    pub const ERR_DUPLICATE_FIELD: &str = "duplicate field number";
    pub const ERR_RESERVED_FIELD: &str = "field number in reserved range 19000-19999";
}

/// CodecError is the error type for all encode, decode and registry operations
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("varint exceeds 64 bits")]
    IntegerOverflow,

    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("invalid length: negative or wider than the address space")]
    InvalidLength,

    #[error("end group without matching start group")]
    UnmatchedEndOfGroup,

    #[error("malformed wire type: {0}")]
    MalformedWireType(u8),

    #[error("wrong wire type for {message} field {field}: expected {expected:?}, found {found:?}")]
    FieldTypeMismatch {
        message: &'static str,
        field: u32,
        expected: WireType,
        found: WireType,
    },

    #[error("invalid field number: {0}")]
    InvalidFieldNumber(u64),

    #[error("invalid UTF-8 in string field: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("recursion limit of {0} nested messages exceeded")]
    RecursionLimitExceeded(u32),

    #[error("message too large: {size} bytes (limit {limit})")]
    MessageTooLarge { size: usize, limit: usize },

    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("unknown message type: {0}")]
    UnknownType(String),

    #[error("message type registered twice: {0}")]
    DuplicateType(&'static str),

    #[error("invalid schema for {message}: {reason}")]
    InvalidSchema {
        message: &'static str,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Type alias for Results using CodecError
pub type Result<T> = std::result::Result<T, CodecError>;

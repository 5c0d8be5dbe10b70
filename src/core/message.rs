//! # Message Trait
//!
//! The typed surface of the codec. A type becomes encodable by naming itself
//! and returning its schema; every encode and decode method is provided.
//!
//! ## Unknown Fields
//! By default fields missing from the schema are skipped and dropped. A type
//! that proxies or stores records it does not fully understand can keep them
//! by holding an [`UnknownFields`] value and overriding
//! `unknown_fields`/`unknown_fields_mut`; the retained bytes are written back
//! after the known fields on encode.

use crate::config::DecodeConfig;
use crate::core::deserializer;
use crate::core::schema::Schema;
use crate::core::serializer;
use crate::core::size;
use crate::error::Result;
use bytes::Bytes;
use std::any::Any;
use std::fmt;

/// A record described by a static schema
pub trait Message: Default + fmt::Debug + Send + Sync + 'static {
    /// Fully qualified protobuf type name
    const TYPE_NAME: &'static str;

    /// Field descriptors, built once per type
    fn schema() -> &'static Schema<Self>;

    /// Retained unknown fields, if this type keeps them
    fn unknown_fields(&self) -> Option<&UnknownFields> {
        None
    }

    fn unknown_fields_mut(&mut self) -> Option<&mut UnknownFields> {
        None
    }

    /// Exact encoded length in bytes
    fn encoded_len(&self) -> usize {
        size::encoded_len(self)
    }

    fn encode_to_vec(&self) -> Result<Vec<u8>> {
        serializer::encode_to_vec(self)
    }

    /// Encode into the front of `buf`, returning the byte count
    fn encode_to_slice(&self, buf: &mut [u8]) -> Result<usize> {
        serializer::encode_to_slice(self, buf)
    }

    fn encode_to_bytes(&self) -> Result<Bytes> {
        serializer::encode_to_bytes(self)
    }

    /// Decode with default limits
    fn decode(buf: &[u8]) -> Result<Self> {
        deserializer::decode(buf)
    }

    fn decode_with(buf: &[u8], config: &DecodeConfig) -> Result<Self> {
        deserializer::decode_with(buf, config)
    }
}

/// Raw bytes of fields a schema did not recognize, in encounter order.
///
/// Each entry is stored exactly as read: tag followed by payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct UnknownFields {
    raw: Vec<u8>,
}

impl UnknownFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_raw(&mut self, field: &[u8]) {
        self.raw.extend_from_slice(field);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

/// Object-safe view of any message, for name-based dispatch.
///
/// Method names differ from [`Message`] so both traits can be in scope.
pub trait DynMessage: fmt::Debug + Send + Sync {
    fn type_name(&self) -> &'static str;

    /// Exact encoded length in bytes
    fn byte_len(&self) -> usize;

    fn to_bytes(&self) -> Result<Vec<u8>>;

    fn as_any(&self) -> &dyn Any;
}

impl<M: Message> DynMessage for M {
    fn type_name(&self) -> &'static str {
        M::TYPE_NAME
    }

    fn byte_len(&self) -> usize {
        self.encoded_len()
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        self.encode_to_vec()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn DynMessage {
    /// Downcast to a concrete message type
    pub fn downcast_ref<M: Message>(&self) -> Option<&M> {
        self.as_any().downcast_ref::<M>()
    }
}

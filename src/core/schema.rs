//! # Message Schemas
//!
//! A schema is the ordered list of field descriptors for one message type.
//! It is pure data: field number, name, wire type, kind, and a pair of
//! accessor functions into the Rust struct. The size calculator, serializer
//! and deserializer walk this list; no message type carries hand-written
//! encode or decode routines.
//!
//! Embedded messages, repeated messages and pagination wrappers are all the
//! same thing here: a length-delimited field whose payload is described by
//! another schema.
//!
//! ## Usage
//! ```rust
//! use once_cell::sync::Lazy;
//! use zktx_codec::core::scalar::{Str, UInt64};
//! use zktx_codec::core::schema::Schema;
//! use zktx_codec::Message;
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! struct Account {
//!     owner: String,
//!     nonce: u64,
//! }
//!
//! impl Message for Account {
//!     const TYPE_NAME: &'static str = "demo.Account";
//!
//!     fn schema() -> &'static Schema<Self> {
//!         static SCHEMA: Lazy<Schema<Account>> = Lazy::new(|| {
//!             Schema::<Account>::builder(Account::TYPE_NAME)
//!                 .scalar::<Str>(1, "owner", |m| &m.owner, |m| &mut m.owner)
//!                 .scalar::<UInt64>(2, "nonce", |m| &m.nonce, |m| &mut m.nonce)
//!                 .build()
//!         });
//!         &SCHEMA
//!     }
//! }
//!
//! let account = Account { owner: "alice".into(), nonce: 7 };
//! let bytes = account.encode_to_vec().unwrap();
//! assert_eq!(Account::decode(&bytes).unwrap(), account);
//! ```

use crate::core::deserializer::{self, DecodeContext, Reader};
use crate::core::message::Message;
use crate::core::scalar::ScalarCodec;
use crate::core::serializer::{self, SizedWriter};
use crate::core::size;
use crate::core::wire::{WireType, MAX_FIELD_NUMBER};
use crate::error::{constants, CodecError, Result};
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

/// Shape of a field's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Single scalar, elided when zero
    Scalar,
    /// Single embedded message
    Message,
    /// Repeated scalar, one tag per element
    RepeatedScalar,
    /// Repeated embedded message, one tag per element
    RepeatedMessage,
}

impl FieldKind {
    pub fn is_repeated(self) -> bool {
        matches!(self, FieldKind::RepeatedScalar | FieldKind::RepeatedMessage)
    }
}

/// Encode/decode routines for one field, bound to its accessors
trait FieldCodec<M>: Send + Sync {
    fn kind(&self) -> FieldKind;
    fn wire_type(&self) -> WireType;
    /// Protobuf type name of the value
    fn type_name(&self) -> &'static str;
    fn accepts(&self, wire_type: WireType) -> bool {
        wire_type == self.wire_type()
    }
    fn encoded_len(&self, number: u32, msg: &M) -> usize;
    fn write(&self, number: u32, msg: &M, w: &mut SizedWriter<'_>);
    fn merge(
        &self,
        msg: &mut M,
        wire_type: WireType,
        r: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<()>;
}

struct ScalarField<M, S: ScalarCodec> {
    get: fn(&M) -> &S::Value,
    get_mut: fn(&mut M) -> &mut S::Value,
    _codec: PhantomData<fn() -> S>,
}

impl<M, S: ScalarCodec> FieldCodec<M> for ScalarField<M, S> {
    fn kind(&self) -> FieldKind {
        FieldKind::Scalar
    }

    fn wire_type(&self) -> WireType {
        S::WIRE_TYPE
    }

    fn type_name(&self) -> &'static str {
        S::NAME
    }

    fn encoded_len(&self, number: u32, msg: &M) -> usize {
        let value = (self.get)(msg);
        if S::is_default(value) {
            return 0;
        }
        size::field_len(number, S::payload_len(value))
    }

    fn write(&self, number: u32, msg: &M, w: &mut SizedWriter<'_>) {
        let value = (self.get)(msg);
        if S::is_default(value) {
            return;
        }
        S::write(value, w);
        w.put_tag(number, S::WIRE_TYPE);
    }

    fn merge(
        &self,
        msg: &mut M,
        _wire_type: WireType,
        r: &mut Reader<'_>,
        _ctx: DecodeContext,
    ) -> Result<()> {
        *(self.get_mut)(msg) = S::read(r)?;
        Ok(())
    }
}

struct RepeatedScalarField<M, S: ScalarCodec> {
    get: fn(&M) -> &Vec<S::Value>,
    get_mut: fn(&mut M) -> &mut Vec<S::Value>,
    _codec: PhantomData<fn() -> S>,
}

impl<M, S: ScalarCodec> FieldCodec<M> for RepeatedScalarField<M, S> {
    fn kind(&self) -> FieldKind {
        FieldKind::RepeatedScalar
    }

    fn wire_type(&self) -> WireType {
        S::WIRE_TYPE
    }

    fn type_name(&self) -> &'static str {
        S::NAME
    }

    fn accepts(&self, wire_type: WireType) -> bool {
        wire_type == S::WIRE_TYPE || (S::packable() && wire_type == WireType::LengthDelimited)
    }

    fn encoded_len(&self, number: u32, msg: &M) -> usize {
        // Elements are never elided; zero is a meaningful list entry
        (self.get)(msg).iter().fold(0usize, |acc, value| {
            acc.saturating_add(size::field_len(number, S::payload_len(value)))
        })
    }

    fn write(&self, number: u32, msg: &M, w: &mut SizedWriter<'_>) {
        for value in (self.get)(msg).iter().rev() {
            S::write(value, w);
            w.put_tag(number, S::WIRE_TYPE);
        }
    }

    fn merge(
        &self,
        msg: &mut M,
        wire_type: WireType,
        r: &mut Reader<'_>,
        _ctx: DecodeContext,
    ) -> Result<()> {
        let values = (self.get_mut)(msg);
        if wire_type == S::WIRE_TYPE {
            values.push(S::read(r)?);
            return Ok(());
        }

        // Packed: one length-delimited run of bare payloads
        let mut packed = Reader::new(r.read_length_delimited()?);
        while !packed.is_empty() {
            values.push(S::read(&mut packed)?);
        }
        Ok(())
    }
}

struct MessageField<M, N> {
    get: fn(&M) -> Option<&N>,
    get_mut: fn(&mut M) -> &mut N,
}

impl<M, N: Message> FieldCodec<M> for MessageField<M, N> {
    fn kind(&self) -> FieldKind {
        FieldKind::Message
    }

    fn wire_type(&self) -> WireType {
        WireType::LengthDelimited
    }

    fn type_name(&self) -> &'static str {
        N::TYPE_NAME
    }

    fn encoded_len(&self, number: u32, msg: &M) -> usize {
        (self.get)(msg).map_or(0, |nested| size::nested_len(number, nested))
    }

    fn write(&self, number: u32, msg: &M, w: &mut SizedWriter<'_>) {
        if let Some(nested) = (self.get)(msg) {
            serializer::write_nested(nested, number, w);
        }
    }

    fn merge(
        &self,
        msg: &mut M,
        _wire_type: WireType,
        r: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<()> {
        // A repeated occurrence merges into the existing value
        deserializer::merge_nested((self.get_mut)(msg), r, ctx)
    }
}

struct RepeatedMessageField<M, N> {
    get: fn(&M) -> &Vec<N>,
    get_mut: fn(&mut M) -> &mut Vec<N>,
}

impl<M, N: Message> FieldCodec<M> for RepeatedMessageField<M, N> {
    fn kind(&self) -> FieldKind {
        FieldKind::RepeatedMessage
    }

    fn wire_type(&self) -> WireType {
        WireType::LengthDelimited
    }

    fn type_name(&self) -> &'static str {
        N::TYPE_NAME
    }

    fn encoded_len(&self, number: u32, msg: &M) -> usize {
        (self.get)(msg).iter().fold(0usize, |acc, nested| {
            acc.saturating_add(size::nested_len(number, nested))
        })
    }

    fn write(&self, number: u32, msg: &M, w: &mut SizedWriter<'_>) {
        for nested in (self.get)(msg).iter().rev() {
            serializer::write_nested(nested, number, w);
        }
    }

    fn merge(
        &self,
        msg: &mut M,
        _wire_type: WireType,
        r: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<()> {
        let mut element = N::default();
        deserializer::merge_nested(&mut element, r, ctx)?;
        (self.get_mut)(msg).push(element);
        Ok(())
    }
}

/// One field of a message schema
pub struct FieldDescriptor<M> {
    number: u32,
    name: &'static str,
    codec: Box<dyn FieldCodec<M>>,
}

impl<M> FieldDescriptor<M> {
    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.codec.kind()
    }

    /// Wire type the encoder emits for this field
    pub fn wire_type(&self) -> WireType {
        self.codec.wire_type()
    }

    /// Scalar type name, or the nested message's type name
    pub fn type_name(&self) -> &'static str {
        self.codec.type_name()
    }

    /// Whether a decoded tag with `wire_type` may populate this field
    pub fn accepts(&self, wire_type: WireType) -> bool {
        self.codec.accepts(wire_type)
    }

    /// Owned summary without the accessors
    pub fn info(&self) -> FieldInfo {
        FieldInfo {
            number: self.number,
            name: self.name,
            kind: self.kind(),
            wire_type: self.wire_type(),
            type_name: self.type_name(),
        }
    }

    pub(crate) fn encoded_len(&self, msg: &M) -> usize {
        self.codec.encoded_len(self.number, msg)
    }

    pub(crate) fn write(&self, msg: &M, w: &mut SizedWriter<'_>) {
        self.codec.write(self.number, msg, w);
    }

    pub(crate) fn merge(
        &self,
        msg: &mut M,
        wire_type: WireType,
        r: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<()> {
        self.codec.merge(msg, wire_type, r, ctx)
    }
}

impl<M> fmt::Debug for FieldDescriptor<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("number", &self.number)
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("wire_type", &self.wire_type())
            .field("type_name", &self.type_name())
            .finish()
    }
}

/// Type-erased description of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub number: u32,
    pub name: &'static str,
    pub kind: FieldKind,
    pub wire_type: WireType,
    pub type_name: &'static str,
}

/// Ordered field descriptors for message type `M`
pub struct Schema<M> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<M>>,
    // (field number, index into `fields`), sorted by number
    by_number: Vec<(u32, usize)>,
}

impl<M: 'static> Schema<M> {
    pub fn builder(type_name: &'static str) -> SchemaBuilder<M> {
        SchemaBuilder {
            type_name,
            fields: Vec::new(),
        }
    }

    /// Fully qualified message type name
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor<M>] {
        &self.fields
    }

    /// Look up a field by number
    #[inline]
    pub fn field(&self, number: u32) -> Option<&FieldDescriptor<M>> {
        self.by_number
            .binary_search_by_key(&number, |&(n, _)| n)
            .ok()
            .map(|i| &self.fields[self.by_number[i].1])
    }

    /// Summaries of every field in declaration order
    pub fn field_infos(&self) -> Vec<FieldInfo> {
        self.fields.iter().map(FieldDescriptor::info).collect()
    }

    /// Check field numbers: positive, in range, outside the reserved block,
    /// and unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            let reason = if field.number == 0 {
                Some(constants::ERR_FIELD_NUMBER_ZERO)
            } else if field.number > MAX_FIELD_NUMBER {
                Some(constants::ERR_FIELD_NUMBER_RANGE)
            } else if (19_000..=19_999).contains(&field.number) {
                Some(constants::ERR_RESERVED_FIELD)
            } else if !seen.insert(field.number) {
                Some(constants::ERR_DUPLICATE_FIELD)
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(CodecError::InvalidSchema {
                    message: self.type_name,
                    reason: format!("{reason}: {} ({})", field.number, field.name),
                });
            }
        }
        Ok(())
    }
}

impl<M> fmt::Debug for Schema<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Collects field descriptors in declaration order
pub struct SchemaBuilder<M> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<M>>,
}

impl<M: 'static> SchemaBuilder<M> {
    fn push(mut self, number: u32, name: &'static str, codec: Box<dyn FieldCodec<M>>) -> Self {
        self.fields.push(FieldDescriptor {
            number,
            name,
            codec,
        });
        self
    }

    /// Add a singular scalar field
    pub fn scalar<S: ScalarCodec>(
        self,
        number: u32,
        name: &'static str,
        get: fn(&M) -> &S::Value,
        get_mut: fn(&mut M) -> &mut S::Value,
    ) -> Self {
        self.push(
            number,
            name,
            Box::new(ScalarField::<M, S> {
                get,
                get_mut,
                _codec: PhantomData,
            }),
        )
    }

    /// Add a repeated scalar field
    pub fn repeated<S: ScalarCodec>(
        self,
        number: u32,
        name: &'static str,
        get: fn(&M) -> &Vec<S::Value>,
        get_mut: fn(&mut M) -> &mut Vec<S::Value>,
    ) -> Self {
        self.push(
            number,
            name,
            Box::new(RepeatedScalarField::<M, S> {
                get,
                get_mut,
                _codec: PhantomData,
            }),
        )
    }

    /// Add an embedded message field.
    ///
    /// `get` returns `None` when the field is absent; a non-nullable field
    /// always returns `Some` and is emitted even when empty.
    pub fn message<N: Message>(
        self,
        number: u32,
        name: &'static str,
        get: fn(&M) -> Option<&N>,
        get_mut: fn(&mut M) -> &mut N,
    ) -> Self {
        self.push(number, name, Box::new(MessageField { get, get_mut }))
    }

    /// Add a repeated embedded message field
    pub fn repeated_message<N: Message>(
        self,
        number: u32,
        name: &'static str,
        get: fn(&M) -> &Vec<N>,
        get_mut: fn(&mut M) -> &mut Vec<N>,
    ) -> Self {
        self.push(number, name, Box::new(RepeatedMessageField { get, get_mut }))
    }

    /// Finish the schema, rejecting bad or duplicate field numbers.
    ///
    /// # Errors
    /// `InvalidSchema` naming the first offending field
    pub fn try_build(self) -> Result<Schema<M>> {
        let mut by_number: Vec<(u32, usize)> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.number, i))
            .collect();
        by_number.sort_unstable();

        let schema = Schema {
            type_name: self.type_name,
            fields: self.fields,
            by_number,
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Finish a schema declared in code.
    ///
    /// # Panics
    /// When [`try_build`](Self::try_build) fails. Schemas are static
    /// declarations, so a bad field number is a bug in the declaring crate.
    pub fn build(self) -> Schema<M> {
        match self.try_build() {
            Ok(schema) => schema,
            Err(err) => panic!("{err}"),
        }
    }
}

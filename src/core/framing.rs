//! # Delimited Framing
//!
//! `tokio_util` codec for streams of messages, each preceded by its varint
//! byte length:
//!
//! ```text
//! varint(len) || len bytes of message
//! ```
//!
//! This is the same layout protobuf's `writeDelimitedTo` produces. The codec
//! opens no sockets; wrap any `AsyncRead`/`AsyncWrite` in
//! `FramedRead`/`FramedWrite` to use it.
//!
//! ## Limits
//! A frame announcing more than `max_frame_length` bytes is rejected as soon
//! as its prefix is read, before any payload is buffered. Payloads are then
//! decoded under the configured [`DecodeConfig`].

use crate::config::{DecodeConfig, FramingConfig};
use crate::core::message::Message;
use crate::core::serializer::{self, MAX_MESSAGE_LEN};
use crate::core::varint;
use crate::error::{CodecError, Result};
use crate::utils::metrics::Metrics;
use bytes::{BufMut, BytesMut};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

/// Varint-length-delimited codec for messages of type `M`
pub struct DelimitedCodec<M> {
    framing: FramingConfig,
    decode: DecodeConfig,
    metrics: Option<Arc<Metrics>>,
    _message: PhantomData<fn() -> M>,
}

impl<M: Message> DelimitedCodec<M> {
    /// Codec with default limits
    pub fn new() -> Self {
        Self::with_config(FramingConfig::default(), DecodeConfig::default())
    }

    pub fn with_config(framing: FramingConfig, decode: DecodeConfig) -> Self {
        Self {
            framing,
            decode,
            metrics: None,
            _message: PhantomData,
        }
    }

    /// Record frame counters into `metrics`
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn max_frame_length(&self) -> usize {
        self.framing.max_frame_length
    }

    fn reject_oversized(&self, size: usize) -> CodecError {
        if let Some(metrics) = &self.metrics {
            metrics.oversized_frame();
        }
        debug!(
            message = M::TYPE_NAME,
            size,
            limit = self.framing.max_frame_length,
            "Rejected oversized frame"
        );
        CodecError::MessageTooLarge {
            size,
            limit: self.framing.max_frame_length,
        }
    }

    fn record_decode_error(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.decode_error();
        }
    }
}

impl<M: Message> Default for DelimitedCodec<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for DelimitedCodec<M> {
    fn clone(&self) -> Self {
        Self {
            framing: self.framing,
            decode: self.decode,
            metrics: self.metrics.clone(),
            _message: PhantomData,
        }
    }
}

impl<M> fmt::Debug for DelimitedCodec<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelimitedCodec")
            .field("framing", &self.framing)
            .field("decode", &self.decode)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl<M: Message> Decoder for DelimitedCodec<M> {
    type Item = M;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<M>> {
        let (len, prefix_len) = match varint::decode(&src[..], 0) {
            Ok(prefix) => prefix,
            // Prefix not fully arrived yet
            Err(CodecError::UnexpectedEndOfInput) => return Ok(None),
            Err(e) => {
                self.record_decode_error();
                return Err(e);
            }
        };

        let len = usize::try_from(len).unwrap_or(usize::MAX);
        if len > self.framing.max_frame_length {
            return Err(self.reject_oversized(len));
        }

        let frame_len = prefix_len + len;
        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        let frame = src.split_to(frame_len);
        match M::decode_with(&frame[prefix_len..], &self.decode) {
            Ok(msg) => {
                if let Some(metrics) = &self.metrics {
                    metrics.frame_decoded(frame_len as u64);
                }
                Ok(Some(msg))
            }
            Err(e) => {
                self.record_decode_error();
                Err(e)
            }
        }
    }
}

impl<M: Message> Encoder<&M> for DelimitedCodec<M> {
    type Error = CodecError;

    fn encode(&mut self, msg: &M, dst: &mut BytesMut) -> Result<()> {
        let len = msg.encoded_len();
        let limit = self.framing.max_frame_length.min(MAX_MESSAGE_LEN);
        if len > limit {
            return Err(self.reject_oversized(len));
        }

        let prefix_len = varint::encoded_len(len as u64);
        dst.reserve(prefix_len + len);
        varint::encode(len as u64, dst);

        let start = dst.len();
        dst.resize(start + len, 0);
        serializer::write_sized(msg, &mut dst[start..]);

        if let Some(metrics) = &self.metrics {
            metrics.frame_encoded((prefix_len + len) as u64);
        }
        Ok(())
    }
}

impl<M: Message> Encoder<M> for DelimitedCodec<M> {
    type Error = CodecError;

    fn encode(&mut self, msg: M, dst: &mut BytesMut) -> Result<()> {
        Encoder::<&M>::encode(self, &msg, dst)
    }
}

/// Write one length-delimited message to `dst`
pub fn encode_delimited<M: Message>(msg: &M, dst: &mut impl BufMut) -> Result<()> {
    let body = msg.encode_to_vec()?;
    varint::encode(body.len() as u64, dst);
    dst.put_slice(&body);
    Ok(())
}

//! Observability and Metrics
//!
//! Counters for the framing layer. The core encode/decode functions are pure
//! and record nothing; a `DelimitedCodec` built with `with_metrics` updates
//! a shared `Metrics` on every frame.
//!
//! Uses atomic counters for thread-safe metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Frame and byte counters for one or more codecs
#[derive(Debug)]
pub struct Metrics {
    /// Frames written by an encoder
    pub frames_encoded: AtomicU64,
    /// Frames fully decoded
    pub frames_decoded: AtomicU64,
    /// Bytes written, length prefixes included
    pub bytes_encoded: AtomicU64,
    /// Bytes consumed, length prefixes included
    pub bytes_decoded: AtomicU64,
    /// Frames whose payload failed to decode
    pub decode_errors: AtomicU64,
    /// Frames rejected for exceeding the frame limit
    pub oversized_frames: AtomicU64,
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            frames_encoded: AtomicU64::new(0),
            frames_decoded: AtomicU64::new(0),
            bytes_encoded: AtomicU64::new(0),
            bytes_decoded: AtomicU64::new(0),
            decode_errors: AtomicU64::new(0),
            oversized_frames: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a frame written
    pub fn frame_encoded(&self, byte_count: u64) {
        self.frames_encoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_encoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a frame read
    pub fn frame_decoded(&self, byte_count: u64) {
        self.frames_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_decoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    pub fn decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn oversized_frame(&self) {
        self.oversized_frames.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_encoded: self.frames_encoded.load(Ordering::Relaxed),
            frames_decoded: self.frames_decoded.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            bytes_decoded: self.bytes_decoded.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            oversized_frames: self.oversized_frames.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            frames_encoded = snapshot.frames_encoded,
            frames_decoded = snapshot.frames_decoded,
            bytes_encoded = snapshot.bytes_encoded,
            bytes_decoded = snapshot.bytes_decoded,
            decode_errors = snapshot.decode_errors,
            oversized_frames = snapshot.oversized_frames,
            uptime_seconds = snapshot.uptime_seconds,
            "Codec metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub frames_encoded: u64,
    pub frames_decoded: u64,
    pub bytes_encoded: u64,
    pub bytes_decoded: u64,
    pub decode_errors: u64,
    pub oversized_frames: u64,
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_counters_accumulate_across_threads() {
        let metrics = Arc::new(Metrics::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..250 {
                        metrics.frame_encoded(3);
                        metrics.frame_decoded(3);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().ok();
        }
        metrics.decode_error();
        metrics.oversized_frame();

        let snap = metrics.snapshot();
        assert_eq!(snap.frames_encoded, 1000);
        assert_eq!(snap.bytes_encoded, 3000);
        assert_eq!(snap.frames_decoded, 1000);
        assert_eq!(snap.bytes_decoded, 3000);
        assert_eq!(snap.decode_errors, 1);
        assert_eq!(snap.oversized_frames, 1);
    }
}

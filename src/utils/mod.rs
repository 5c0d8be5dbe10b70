//! # Utility Modules
//!
//! Supporting utilities shared by the codec and the framing layer.
//!
//! ## Components
//! - **Logging**: Structured logging setup over `tracing-subscriber`
//! - **Metrics**: Thread-safe frame and byte counters

pub mod logging;
pub mod metrics;

pub use metrics::{Metrics, MetricsSnapshot};

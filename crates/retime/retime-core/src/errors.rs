//! Error taxonomy for retiming operations.

use thiserror::Error;

/// Rejections raised by a keyframe store when a write cannot be honored.
/// These abort the affected curve only; the batch carries on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("key index {index} out of range ({len} keys)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("time {time} at key {index} would break key order against neighbor at {neighbor}")]
    OrderViolation {
        index: usize,
        time: f64,
        neighbor: f64,
    },
}

/// Invocation-level failures, raised before any curve is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RetimeError {
    #[error("a retime value is required")]
    MissingValue,
}

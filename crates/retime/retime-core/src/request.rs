//! Request contracts for retiming: the resolved per-invocation request,
//! the raw host-facing argument surface, and the preset table a panel
//! exposes. Hosts build these and hand them to the Retimer.

use serde::{Deserialize, Serialize};

use crate::errors::RetimeError;
use crate::plan::ONE_FRAME;

/// How the retime value reshapes in-window key spacing.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RetimeMode {
    /// The value replaces the spacing between in-window keys outright.
    Absolute,
    /// The value nudges each original spacing, floored at one frame.
    Incremental,
}

/// One resolved retime invocation, shared across every curve in the batch.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RetimeRequest {
    /// Signed time delta in frames.
    pub value: f64,
    pub mode: RetimeMode,
    /// Window start, in frames (inclusive).
    pub range_start: f64,
    /// Window end, in frames (inclusive).
    pub range_end: f64,
}

impl RetimeRequest {
    pub fn absolute(value: f64, range_start: f64, range_end: f64) -> Self {
        Self {
            value,
            mode: RetimeMode::Absolute,
            range_start,
            range_end,
        }
    }

    pub fn incremental(value: f64, range_start: f64, range_end: f64) -> Self {
        Self {
            value,
            mode: RetimeMode::Incremental,
            range_start,
            range_end,
        }
    }
}

/// Raw command arguments as a host hands them over. `value` is required;
/// its absence is rejected before any curve is touched.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RetimeArgs {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub incremental: bool,
}

impl RetimeArgs {
    /// Resolve into a request over the given inclusive window.
    pub fn into_request(self, range_start: f64, range_end: f64) -> Result<RetimeRequest, RetimeError> {
        let value = self.value.ok_or(RetimeError::MissingValue)?;
        let mode = if self.incremental {
            RetimeMode::Incremental
        } else {
            RetimeMode::Absolute
        };
        Ok(RetimeRequest {
            value,
            mode,
            range_start,
            range_end,
        })
    }
}

/// Convert a host playback range with an exclusive end into the inclusive
/// window this crate consumes.
pub fn inclusive_range(start_frame: f64, end_frame_exclusive: f64) -> (f64, f64) {
    (start_frame, end_frame_exclusive - ONE_FRAME)
}

/// A panel preset: the value/mode pair behind one retime button.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RetimePreset {
    pub value: f64,
    pub incremental: bool,
}

impl RetimePreset {
    /// Absolute spacing presets, 1f through 6f.
    pub fn absolute_presets() -> Vec<RetimePreset> {
        (1..=6)
            .map(|v| RetimePreset {
                value: f64::from(v),
                incremental: false,
            })
            .collect()
    }

    /// Relative nudge presets: -2f, -1f, 1f, 2f.
    pub fn relative_presets() -> Vec<RetimePreset> {
        [-2.0, -1.0, 1.0, 2.0]
            .into_iter()
            .map(|value| RetimePreset {
                value,
                incremental: true,
            })
            .collect()
    }

    /// Button label, e.g. "3f" or "-2f".
    pub fn label(&self) -> String {
        format!("{}f", self.value)
    }

    /// Bind this preset to a resolved window.
    pub fn request(&self, range_start: f64, range_end: f64) -> RetimeRequest {
        RetimeRequest {
            value: self.value,
            mode: if self.incremental {
                RetimeMode::Incremental
            } else {
                RetimeMode::Absolute
            },
            range_start,
            range_end,
        }
    }
}

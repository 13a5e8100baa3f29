//! Retime plan construction: the pure remapping of key times for one curve.
//!
//! A plan is built from a snapshot of the curve's current times before any
//! write happens, so the applier never has to re-read a time whose original
//! value matters after the store has started moving keys.

use serde::{Deserialize, Serialize};

use crate::curve::KeyStore;
use crate::request::{RetimeMode, RetimeRequest};

/// Fixed minimum spacing between adjacent keys, in frames.
pub const ONE_FRAME: f64 = 1.0;

/// Unreachable upper bound carried by the sentinel plan entry.
pub const MAX_TIME: f64 = 9_999_999.0;

/// One planned time update.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlanEntry {
    pub index: usize,
    pub new_time: f64,
    pub orig_time: f64,
}

/// Ordered updates for one curve, from the root key through the last real
/// key, terminated by a sentinel entry that is never written. The sentinel
/// gives the last real entry an always-safe ordering bound.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RetimePlan {
    pub entries: Vec<PlanEntry>,
}

impl RetimePlan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of writable entries, excluding the sentinel.
    pub fn real_len(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }
}

/// Index of the last key not after `target`, or None when even the first
/// key lies beyond it.
pub fn floor_index(store: &dyn KeyStore, target: f64) -> Option<usize> {
    let index = store.closest_index(target)?;
    if store.time_at(index) > target {
        index.checked_sub(1)
    } else {
        Some(index)
    }
}

/// Compute the ordered time updates implied by `request` for one curve.
///
/// The root key (last key at or before the window start) anchors the walk
/// and never moves. Keys up to one index past the window end take the
/// retimed spacing; later keys keep their original spacing and ride along
/// on whatever offset has accumulated. An empty curve, or a window with no
/// key at or before its start, yields an empty plan.
pub fn build_plan(store: &dyn KeyStore, request: &RetimeRequest) -> RetimePlan {
    let mut plan = RetimePlan::default();
    if store.is_empty() {
        return plan;
    }
    let Some(root) = floor_index(store, request.range_start) else {
        return plan;
    };
    let last = floor_index(store, request.range_end);

    let root_time = store.time_at(root);
    plan.entries.push(PlanEntry {
        index: root,
        new_time: root_time,
        orig_time: root_time,
    });

    let mut current_original = root_time;
    let mut previous_new = root_time;
    for index in (root + 1)..store.len() {
        let orig = store.time_at(index);
        // In-window treatment extends one key past the window end so the
        // return to original spacing is anchored on an adjusted key.
        let in_window = last.map_or(false, |l| index <= l + 1);
        let delta = match request.mode {
            RetimeMode::Incremental => {
                let mut d = orig - current_original;
                if in_window {
                    d += request.value;
                    if d < ONE_FRAME {
                        d = ONE_FRAME;
                    }
                }
                d
            }
            RetimeMode::Absolute => {
                if in_window {
                    request.value
                } else {
                    orig - current_original
                }
            }
        };
        let new_time = previous_new + delta;
        plan.entries.push(PlanEntry {
            index,
            new_time,
            orig_time: orig,
        });
        current_original = orig;
        previous_new = new_time;
    }

    plan.entries.push(PlanEntry {
        index: store.len(),
        new_time: MAX_TIME,
        orig_time: MAX_TIME,
    });
    plan
}

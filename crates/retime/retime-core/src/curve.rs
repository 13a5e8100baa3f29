//! Curve data model and the in-memory keyframe store.
//!
//! Model:
//! - A Curve is an ordered sequence of Keyframes addressed by index.
//! - Key indices are ordered by time; `time(i) < time(i+1)` holds for every
//!   adjacent pair at every observable moment, including between individual
//!   writes while a plan is being applied.
//! - The KeyStore trait is the capability surface the retiming algorithm
//!   runs against; production adapters wrap a host store, tests use Curve
//!   directly.

use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::ids::CurveId;

/// A single timed key. `value` is an opaque payload preserved verbatim;
/// retiming only ever rewrites `time`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Keyframe {
    /// Time in frames.
    pub time: f64,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl Keyframe {
    pub fn new(time: f64, value: serde_json::Value) -> Self {
        Self { time, value }
    }
}

/// Read/write capability over a live, order-sensitive keyframe store.
pub trait KeyStore {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current time of the key at `index`. `index` must be below `len()`.
    fn time_at(&self, index: usize) -> f64;

    /// Write a new time for the key at `index`. Returns Ok(true) when the
    /// stored time changed. A write that would land on or past a current
    /// neighbor is refused with `StoreError::OrderViolation`.
    fn set_time(&mut self, index: usize, time: f64) -> Result<bool, StoreError>;

    /// Index of the key nearest to `time`, or None when the store is empty.
    fn closest_index(&self, time: f64) -> Option<usize>;
}

/// A named animation curve targeting one animated channel.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Curve {
    /// Internal id assigned when loaded into a Retimer.
    #[serde(skip)]
    pub id: Option<CurveId>,
    pub name: String,
    /// Canonical target path (e.g. "ball/Transform.translateY").
    pub target: String,
    pub keys: Vec<Keyframe>,
}

impl Curve {
    pub fn new(name: impl Into<String>, target: impl Into<String>, keys: Vec<Keyframe>) -> Self {
        Self {
            id: None,
            name: name.into(),
            target: target.into(),
            keys,
        }
    }

    /// Validate basic invariants (finite times, strictly increasing).
    pub fn validate(&self) -> Result<(), String> {
        let mut last = f64::NEG_INFINITY;
        for key in &self.keys {
            if !key.time.is_finite() {
                return Err(format!("key time must be finite for '{}'", self.target));
            }
            if key.time <= last {
                return Err(format!(
                    "key times must be strictly increasing for '{}'",
                    self.target
                ));
            }
            last = key.time;
        }
        Ok(())
    }

    /// Snapshot of all key times in index order.
    pub fn key_times(&self) -> Vec<f64> {
        self.keys.iter().map(|k| k.time).collect()
    }
}

impl KeyStore for Curve {
    fn len(&self) -> usize {
        self.keys.len()
    }

    fn time_at(&self, index: usize) -> f64 {
        self.keys[index].time
    }

    fn set_time(&mut self, index: usize, time: f64) -> Result<bool, StoreError> {
        let len = self.keys.len();
        if index >= len {
            return Err(StoreError::IndexOutOfRange { index, len });
        }
        if index > 0 {
            let prev = self.keys[index - 1].time;
            if time <= prev {
                return Err(StoreError::OrderViolation {
                    index,
                    time,
                    neighbor: prev,
                });
            }
        }
        if index + 1 < len {
            let next = self.keys[index + 1].time;
            if time >= next {
                return Err(StoreError::OrderViolation {
                    index,
                    time,
                    neighbor: next,
                });
            }
        }
        let changed = self.keys[index].time != time;
        self.keys[index].time = time;
        Ok(changed)
    }

    fn closest_index(&self, time: f64) -> Option<usize> {
        // Linear scan (could be optimized to binary search if needed)
        let mut best: Option<(usize, f64)> = None;
        for (i, key) in self.keys.iter().enumerate() {
            let dist = (key.time - time).abs();
            match best {
                Some((_, d)) if dist >= d => {}
                _ => best = Some((i, dist)),
            }
        }
        best.map(|(i, _)| i)
    }
}

/// Curve library keyed by CurveId, insertion-ordered.
#[derive(Default, Debug)]
pub struct CurveSet {
    items: Vec<(CurveId, Curve)>,
}

impl CurveSet {
    pub fn insert(&mut self, id: CurveId, curve: Curve) {
        self.items.push((id, curve));
    }

    pub fn get(&self, id: CurveId) -> Option<&Curve> {
        self.items
            .iter()
            .find_map(|(c, d)| if *c == id { Some(d) } else { None })
    }

    pub fn get_mut(&mut self, id: CurveId) -> Option<&mut Curve> {
        self.items
            .iter_mut()
            .find_map(|(c, d)| if *c == id { Some(d) } else { None })
    }

    pub fn iter(&self) -> impl Iterator<Item = &(CurveId, Curve)> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(times: &[f64]) -> Curve {
        let keys = times
            .iter()
            .map(|t| Keyframe::new(*t, serde_json::Value::Null))
            .collect();
        Curve::new("c", "node.t", keys)
    }

    #[test]
    fn set_time_rejects_out_of_range() {
        let mut c = curve(&[1.0, 2.0]);
        assert_eq!(
            c.set_time(2, 5.0),
            Err(StoreError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn set_time_rejects_neighbor_collision() {
        let mut c = curve(&[1.0, 2.0, 3.0]);
        // Landing on the previous key's time inverts nothing but breaks
        // strictness; both directions are refused.
        assert!(matches!(
            c.set_time(1, 1.0),
            Err(StoreError::OrderViolation { index: 1, .. })
        ));
        assert!(matches!(
            c.set_time(1, 3.5),
            Err(StoreError::OrderViolation { index: 1, .. })
        ));
        assert_eq!(c.key_times(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn set_time_reports_changed() {
        let mut c = curve(&[1.0, 2.0, 3.0]);
        assert_eq!(c.set_time(1, 2.5), Ok(true));
        assert_eq!(c.set_time(1, 2.5), Ok(false));
        assert_eq!(c.key_times(), vec![1.0, 2.5, 3.0]);
    }

    #[test]
    fn closest_index_picks_nearest() {
        let c = curve(&[1.0, 4.0, 10.0]);
        assert_eq!(c.closest_index(0.0), Some(0));
        assert_eq!(c.closest_index(4.2), Some(1));
        assert_eq!(c.closest_index(100.0), Some(2));
        assert_eq!(curve(&[]).closest_index(0.0), None);
    }

    #[test]
    fn validate_rejects_unsorted_times() {
        assert!(curve(&[1.0, 1.0]).validate().is_err());
        assert!(curve(&[2.0, 1.0]).validate().is_err());
        assert!(curve(&[1.0, 2.0]).validate().is_ok());
        assert!(curve(&[]).validate().is_ok());
    }
}

//! Change recording: the undo boundary for retime writes.
//!
//! Every write the applier performs is routed through a ChangeRecorder so a
//! host can fold one whole retime request, across all of its curves, into a
//! single undoable step.

use serde::{Deserialize, Serialize};

use crate::curve::{CurveSet, KeyStore};
use crate::errors::StoreError;
use crate::ids::CurveId;

/// One recorded time write.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TimeWrite {
    pub curve: CurveId,
    pub index: usize,
    pub old_time: f64,
    pub new_time: f64,
}

/// Sink for individual time writes.
pub trait ChangeRecorder {
    fn record(&mut self, write: TimeWrite);
}

/// In-memory recorder covering one retime request.
///
/// Undo replays old times in reverse recording order and redo replays new
/// times forward; both walk back/forward through the same intermediate
/// states the safe application order produced, so every replayed write
/// satisfies the store's ordering checks.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ChangeJournal {
    writes: Vec<TimeWrite>,
}

impl ChangeJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeWrite> {
        self.writes.iter()
    }

    /// Revert every recorded write against `curves`. Returns the number of
    /// keys restored.
    pub fn undo_into(&self, curves: &mut CurveSet) -> Result<usize, StoreError> {
        let mut restored = 0;
        for write in self.writes.iter().rev() {
            if let Some(curve) = curves.get_mut(write.curve) {
                if curve.set_time(write.index, write.old_time)? {
                    restored += 1;
                }
            }
        }
        Ok(restored)
    }

    /// Re-apply every recorded write against `curves`.
    pub fn redo_into(&self, curves: &mut CurveSet) -> Result<usize, StoreError> {
        let mut applied = 0;
        for write in self.writes.iter() {
            if let Some(curve) = curves.get_mut(write.curve) {
                if curve.set_time(write.index, write.new_time)? {
                    applied += 1;
                }
            }
        }
        Ok(applied)
    }
}

impl ChangeRecorder for ChangeJournal {
    fn record(&mut self, write: TimeWrite) {
        self.writes.push(write);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{Curve, Keyframe};

    fn set_with_curve(times: &[f64]) -> (CurveSet, CurveId) {
        let keys = times
            .iter()
            .map(|t| Keyframe::new(*t, serde_json::Value::Null))
            .collect();
        let id = CurveId(0);
        let mut set = CurveSet::default();
        set.insert(id, Curve::new("c", "node.t", keys));
        (set, id)
    }

    #[test]
    fn journal_roundtrip_json() {
        let mut journal = ChangeJournal::new();
        journal.record(TimeWrite {
            curve: CurveId(3),
            index: 1,
            old_time: 2.0,
            new_time: 6.0,
        });
        let s = serde_json::to_string(&journal).unwrap();
        let parsed: ChangeJournal = serde_json::from_str(&s).unwrap();
        assert_eq!(journal, parsed);
    }

    #[test]
    fn undo_then_redo_restores_times() {
        let (mut set, id) = set_with_curve(&[1.0, 2.0, 3.0]);
        // Writes in the order a safe application of a forward move would
        // produce: the later key vacates first.
        let mut journal = ChangeJournal::new();
        set.get_mut(id).unwrap().set_time(2, 9.0).unwrap();
        journal.record(TimeWrite {
            curve: id,
            index: 2,
            old_time: 3.0,
            new_time: 9.0,
        });
        set.get_mut(id).unwrap().set_time(1, 5.0).unwrap();
        journal.record(TimeWrite {
            curve: id,
            index: 1,
            old_time: 2.0,
            new_time: 5.0,
        });

        assert_eq!(journal.undo_into(&mut set), Ok(2));
        assert_eq!(set.get(id).unwrap().key_times(), vec![1.0, 2.0, 3.0]);
        assert_eq!(journal.redo_into(&mut set), Ok(2));
        assert_eq!(set.get(id).unwrap().key_times(), vec![1.0, 5.0, 9.0]);
    }
}

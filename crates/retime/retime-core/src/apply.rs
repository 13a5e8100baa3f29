//! Order-safe application of a retime plan to a live store.
//!
//! Key indices are ordered by time and must stay ordered while times are
//! rewritten. A key may only be committed while its new time still sits
//! below the following key's occupied time; otherwise the neighbor has to
//! be relocated out of the way first. The dispatch below decides that per
//! entry using only original neighbor times captured in the plan.

use crate::curve::KeyStore;
use crate::errors::StoreError;
use crate::ids::CurveId;
use crate::plan::{PlanEntry, RetimePlan};
use crate::recorder::{ChangeRecorder, TimeWrite};

/// Commit `plan` to `store`, entry by entry, in an order that keeps the
/// store strictly time-ordered between every pair of writes.
///
/// A write is skipped entirely when the key already holds the planned time.
/// Every performed write is routed through `recorder`. Returns the number
/// of keys whose time actually changed; a store rejection aborts this curve
/// and propagates unmodified.
pub fn apply_plan(
    curve: CurveId,
    store: &mut dyn KeyStore,
    plan: &RetimePlan,
    recorder: &mut dyn ChangeRecorder,
) -> Result<usize, StoreError> {
    let mut changed = 0usize;
    apply_from(curve, store, &plan.entries, 0, recorder, &mut changed)?;
    log::debug!(
        "retimed curve {curve:?}: {changed} of {} keys moved",
        plan.real_len()
    );
    Ok(changed)
}

fn apply_from(
    curve: CurveId,
    store: &mut dyn KeyStore,
    entries: &[PlanEntry],
    at: usize,
    recorder: &mut dyn ChangeRecorder,
    changed: &mut usize,
) -> Result<(), StoreError> {
    if at + 1 >= entries.len() {
        // The sentinel bounds the last real entry and is never written.
        return Ok(());
    }
    let entry = entries[at];
    let next_orig = entries[at + 1].orig_time;

    if entry.new_time < next_orig {
        // Forward-safe: the neighbor's slot is still above the new time.
        update_time(curve, store, entry, recorder, changed)?;
        apply_from(curve, store, entries, at + 1, recorder, changed)
    } else {
        // The neighbor must vacate before this key can land.
        apply_from(curve, store, entries, at + 1, recorder, changed)?;
        update_time(curve, store, entry, recorder, changed)
    }
}

fn update_time(
    curve: CurveId,
    store: &mut dyn KeyStore,
    entry: PlanEntry,
    recorder: &mut dyn ChangeRecorder,
    changed: &mut usize,
) -> Result<(), StoreError> {
    let old_time = store.time_at(entry.index);
    if old_time == entry.new_time {
        return Ok(());
    }
    if store.set_time(entry.index, entry.new_time)? {
        *changed += 1;
        recorder.record(TimeWrite {
            curve,
            index: entry.index,
            old_time,
            new_time: entry.new_time,
        });
    }
    Ok(())
}

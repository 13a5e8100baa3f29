//! Retimer: curve ownership and the host-facing retime operation.
//!
//! Methods:
//! - new, load_curve, curve, retime (resolver + args), retime_curves,
//!   undo/redo over whole-request journals.

use hashbrown::HashSet;

use crate::apply::apply_plan;
use crate::curve::{Curve, CurveSet};
use crate::errors::{RetimeError, StoreError};
use crate::ids::{CurveId, IdAllocator};
use crate::plan::build_plan;
use crate::recorder::ChangeJournal;
use crate::request::{RetimeArgs, RetimeRequest};

/// Resolve one selected object into the animated curves it drives.
///
/// The host owns the relationship graph (what drives what, and how deep to
/// look); the core only consumes resolved ids. Implementations may cache,
/// hence `&mut self`.
pub trait CurveResolver {
    fn resolve(&mut self, selected: &str) -> Vec<CurveId>;
}

/// A per-curve store rejection. The batch carries on; the error is kept
/// verbatim for the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveFailure {
    pub curve: CurveId,
    pub error: StoreError,
}

/// Aggregate result of one retime request across all resolved curves.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RetimeOutcome {
    /// Keys whose time actually changed, across every curve.
    pub keys_changed: usize,
    pub failures: Vec<CurveFailure>,
}

impl RetimeOutcome {
    /// A request that changed nothing is a no-op and must not enter the
    /// undo history.
    pub fn is_undoable(&self) -> bool {
        self.keys_changed > 0
    }
}

/// Owns loaded curves plus the undo/redo history of retime transactions.
#[derive(Default, Debug)]
pub struct Retimer {
    ids: IdAllocator,
    curves: CurveSet,
    undo_stack: Vec<ChangeJournal>,
    redo_stack: Vec<ChangeJournal>,
}

impl Retimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a curve, returning its id.
    pub fn load_curve(&mut self, mut curve: Curve) -> CurveId {
        let id = self.ids.alloc_curve();
        curve.id = Some(id);
        self.curves.insert(id, curve);
        id
    }

    pub fn curve(&self, id: CurveId) -> Option<&Curve> {
        self.curves.get(id)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// The exposed operation: resolve a selection, fail fast when no value
    /// was supplied, then retime every resolved curve as one transaction.
    pub fn retime(
        &mut self,
        selection: &[&str],
        resolver: &mut dyn CurveResolver,
        args: RetimeArgs,
        range: (f64, f64),
    ) -> Result<RetimeOutcome, RetimeError> {
        let request = args.into_request(range.0, range.1)?;

        // A curve driven by several selected objects is retimed once.
        let mut seen: HashSet<CurveId> = HashSet::new();
        let mut ids: Vec<CurveId> = Vec::new();
        for selected in selection {
            for id in resolver.resolve(selected) {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
        }
        Ok(self.retime_curves(&ids, &request))
    }

    /// Run one request against an already-resolved set of curves.
    ///
    /// Unanchored curves are silent no-ops; store rejections surface in the
    /// outcome without aborting the batch. When at least one key moved, the
    /// request's journal joins the undo history and any redo tail is
    /// discarded.
    pub fn retime_curves(&mut self, ids: &[CurveId], request: &RetimeRequest) -> RetimeOutcome {
        let mut outcome = RetimeOutcome::default();
        let mut journal = ChangeJournal::new();

        for &id in ids {
            let Some(curve) = self.curves.get_mut(id) else {
                continue;
            };
            let plan = build_plan(&*curve, request);
            if plan.is_empty() {
                continue;
            }
            match apply_plan(id, curve, &plan, &mut journal) {
                Ok(changed) => outcome.keys_changed += changed,
                Err(error) => {
                    log::warn!("retime rejected by store for curve {id:?}: {error}");
                    outcome.failures.push(CurveFailure { curve: id, error });
                }
            }
        }

        if outcome.is_undoable() {
            self.undo_stack.push(journal);
            self.redo_stack.clear();
        }
        outcome
    }

    /// Revert the most recent undoable retime. Returns keys restored.
    pub fn undo(&mut self) -> Result<usize, StoreError> {
        let Some(journal) = self.undo_stack.pop() else {
            return Ok(0);
        };
        let restored = journal.undo_into(&mut self.curves)?;
        self.redo_stack.push(journal);
        Ok(restored)
    }

    /// Re-apply the most recently undone retime. Returns keys moved.
    pub fn redo(&mut self) -> Result<usize, StoreError> {
        let Some(journal) = self.redo_stack.pop() else {
            return Ok(0);
        };
        let applied = journal.redo_into(&mut self.curves)?;
        self.undo_stack.push(journal);
        Ok(applied)
    }
}

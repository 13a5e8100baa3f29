//! Retime core (host-agnostic).
//!
//! Recomputes key times for a selected window of an animation curve and
//! commits them back to a live, order-sensitive store without ever breaking
//! strict key ordering, even between individual writes. Host concerns
//! (curve discovery, undo stacks, panels) stay behind small injected traits
//! so the whole crate runs against in-memory curves.

pub mod apply;
pub mod curve;
pub mod errors;
pub mod ids;
pub mod plan;
pub mod recorder;
pub mod request;
pub mod retimer;
pub mod stored_curve;

// Re-exports for consumers (adapters)
pub use apply::apply_plan;
pub use curve::{Curve, CurveSet, KeyStore, Keyframe};
pub use errors::{RetimeError, StoreError};
pub use ids::{CurveId, IdAllocator};
pub use plan::{build_plan, floor_index, PlanEntry, RetimePlan, MAX_TIME, ONE_FRAME};
pub use recorder::{ChangeJournal, ChangeRecorder, TimeWrite};
pub use request::{
    inclusive_range, RetimeArgs, RetimeMode, RetimePreset, RetimeRequest,
};
pub use retimer::{CurveFailure, CurveResolver, RetimeOutcome, Retimer};
pub use stored_curve::{parse_stored_curves_json, CurveDocument};

#![forbid(unsafe_code)]

//! Placement solvers for anchored popups.
//!
//! Given where an anchor sits on screen, how big the popup wants to be, and
//! how big the viewport is, [`evaluate`] picks the side of the anchor the
//! popup should open on, clamps it into view, and reports the offset at which
//! a pointer arrow lines up with the anchor's center. [`evaluate_inner`] is
//! the variant for popups drawn inside their anchor.
//!
//! Everything here is pure: no measurement, no timers, no logging.

pub mod evaluate;
pub mod inner;
pub mod position;

pub use evaluate::{
    DEFAULT_ALLEY_WIDTH, DEFAULT_MIN_ANCHOR_OFFSET, Evaluation, FitResult, PlacementConfig,
    anchor_in_view, evaluate,
};
pub use inner::evaluate_inner;
pub use position::{Axis, Position, PriorityError, PriorityList};
pub use tether_core::geometry::{Rect, Size};

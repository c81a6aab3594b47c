#![forbid(unsafe_code)]

//! Placement for popups drawn inside their anchor.
//!
//! Used for bubbles nested in a larger control. Only the first side in the
//! priority list is honored and no fallback search, clamping or dismissal is
//! applied: the caller guarantees the anchor is big enough.

use tether_core::geometry::{Rect, Size};

use crate::evaluate::{Evaluation, FitResult};
use crate::position::{Axis, Position, PriorityList};

/// Place `popup` flush against the interior edge of `anchor` named by the
/// first entry of `priorities`, centered on the cross axis.
///
/// `popup` is the size currently rendered (the constrained size established
/// earlier, or the natural size when nothing constrained it).
/// `is_perfect_fit` reports whether the popup ended up fully inside the
/// anchor.
pub fn evaluate_inner(anchor: Rect, popup: Size, priorities: &PriorityList) -> Evaluation {
    if popup.is_empty() {
        return Evaluation::Unmeasured;
    }

    let position = priorities.first();
    let (left, top) = match position {
        Position::Top => (anchor.center_x() - popup.width / 2.0, anchor.top()),
        Position::Bottom => (
            anchor.center_x() - popup.width / 2.0,
            anchor.bottom() - popup.height,
        ),
        Position::Left => (anchor.left(), anchor.center_y() - popup.height / 2.0),
        Position::Right => (
            anchor.right() - popup.width,
            anchor.center_y() - popup.height / 2.0,
        ),
    };
    let anchor_offset = match position.axis() {
        Axis::Vertical => popup.width / 2.0,
        Axis::Horizontal => popup.height / 2.0,
    };
    let rect = Rect::new(left, top, popup.width, popup.height);

    Evaluation::Placed(FitResult {
        position,
        top,
        left,
        anchor_offset,
        width: popup.width,
        height: popup.height,
        is_perfect_fit: anchor.contains_rect(&rect),
    })
}

#![forbid(unsafe_code)]

//! Position candidate evaluation for anchored popups.
//!
//! [`evaluate`] walks a [`PriorityList`] and, for each side, computes where
//! the popup would land: flush against the anchor on the main axis, centered
//! on the anchor's center line on the cross axis, then clamped into the
//! viewport minus an "alley" margin.
//!
//! # Fit quality
//!
//! - **Perfect fit**: the natural size fits on both axes and the anchor
//!   offset (where a pointer arrow would sit) stays at least
//!   `min_anchor_offset` away from either end of the popup.
//! - **Partial fit**: the popup had to shrink, or clamping pushed it so far
//!   that the pointer would hang off a corner.
//!
//! The first perfect fit in priority order wins. Without one, the first
//! partial fit in priority order wins, position and size together.
//!
//! # Example
//!
//! ```
//! use tether_layout::{Evaluation, PlacementConfig, Position, PriorityList, Rect, Size, evaluate};
//!
//! let anchor = Rect::from_edges(100.0, 100.0, 200.0, 130.0);
//! let result = evaluate(
//!     anchor,
//!     Size::new(300.0, 60.0),
//!     Size::new(1000.0, 800.0),
//!     &PriorityList::default(),
//!     &PlacementConfig::default(),
//! );
//! let Evaluation::Placed(fit) = result else { panic!("expected a placement") };
//! assert_eq!(fit.position, Position::Bottom);
//! assert_eq!((fit.left, fit.top), (2.0, 130.0));
//! assert!(fit.is_perfect_fit);
//! ```

use tether_core::geometry::{Rect, Size, clamp_span};

use crate::position::{Axis, Position, PriorityList};

/// Default margin kept between a popup and the viewport edge.
pub const DEFAULT_ALLEY_WIDTH: f32 = 2.0;

/// Default minimum distance between the anchor offset and a popup corner.
pub const DEFAULT_MIN_ANCHOR_OFFSET: f32 = 16.0;

/// Tunables for [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementConfig {
    /// Margin between the popup and the viewport edges.
    pub alley_width: f32,
    /// How close the anchor offset may get to either end of the popup.
    pub min_anchor_offset: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            alley_width: DEFAULT_ALLEY_WIDTH,
            min_anchor_offset: DEFAULT_MIN_ANCHOR_OFFSET,
        }
    }
}

impl PlacementConfig {
    /// Set the viewport margin.
    #[must_use]
    pub fn alley_width(mut self, alley_width: f32) -> Self {
        self.alley_width = alley_width;
        self
    }

    /// Set the minimum anchor offset.
    #[must_use]
    pub fn min_anchor_offset(mut self, min_anchor_offset: f32) -> Self {
        self.min_anchor_offset = min_anchor_offset;
        self
    }
}

/// Where a single candidate side would put the popup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    /// Side of the anchor the popup opens on.
    pub position: Position,
    /// Absolute top edge of the popup.
    pub top: f32,
    /// Absolute left edge of the popup.
    pub left: f32,
    /// Distance along the cross axis from the popup's near edge to the
    /// anchor's center line.
    pub anchor_offset: f32,
    /// Width to render, never above the natural width.
    pub width: f32,
    /// Height to render, never above the natural height.
    pub height: f32,
    /// Natural size fits and the anchor offset is valid.
    pub is_perfect_fit: bool,
}

impl FitResult {
    /// The popup's rendered rectangle.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    /// The popup's extent along the cross axis.
    #[inline]
    pub fn cross_size(&self) -> f32 {
        match self.position.axis() {
            Axis::Vertical => self.width,
            Axis::Horizontal => self.height,
        }
    }
}

/// Outcome of [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    /// The popup has no natural size yet; nothing to do until it is measured.
    Unmeasured,
    /// The anchor is degenerate or entirely outside the viewport.
    Dismiss,
    /// No side leaves a positive area for the popup.
    NoViablePosition,
    /// The chosen placement.
    Placed(FitResult),
}

impl Evaluation {
    /// The placement, if one was chosen.
    #[inline]
    pub fn placement(&self) -> Option<&FitResult> {
        match self {
            Self::Placed(fit) => Some(fit),
            _ => None,
        }
    }
}

/// Choose a placement for `popup` next to `anchor` within `viewport`.
///
/// Candidates are tried in `priorities` order and the scan stops at the
/// first perfect fit. Otherwise the first candidate with a positive size is
/// returned; later partial fits never replace it.
pub fn evaluate(
    anchor: Rect,
    popup: Size,
    viewport: Size,
    priorities: &PriorityList,
    config: &PlacementConfig,
) -> Evaluation {
    if popup.is_empty() {
        return Evaluation::Unmeasured;
    }
    if !anchor_in_view(anchor, viewport) {
        return Evaluation::Dismiss;
    }

    let mut fallback: Option<FitResult> = None;
    for position in priorities.iter() {
        let Some(fit) = fit_candidate(position, anchor, popup, viewport, config) else {
            continue;
        };
        if fit.is_perfect_fit {
            return Evaluation::Placed(fit);
        }
        if fallback.is_none() {
            fallback = Some(fit);
        }
    }

    fallback.map_or(Evaluation::NoViablePosition, Evaluation::Placed)
}

/// Whether `anchor` is laid out and overlaps the viewport.
///
/// An anchor failing this check is the trigger for dismissing its popup.
#[inline]
pub fn anchor_in_view(anchor: Rect, viewport: Size) -> bool {
    !anchor.is_degenerate() && anchor.intersects(&viewport.bounds())
}

/// Place the popup on one side of the anchor.
///
/// Returns `None` when the side leaves no positive area.
fn fit_candidate(
    position: Position,
    anchor: Rect,
    popup: Size,
    viewport: Size,
    config: &PlacementConfig,
) -> Option<FitResult> {
    let alley = config.alley_width;
    let axis = position.axis();

    let (main_natural, cross_natural) = match axis {
        Axis::Vertical => (popup.height, popup.width),
        Axis::Horizontal => (popup.width, popup.height),
    };
    let (main_extent, cross_extent, anchor_center) = match axis {
        Axis::Vertical => (viewport.height, viewport.width, anchor.center_x()),
        Axis::Horizontal => (viewport.width, viewport.height, anchor.center_y()),
    };

    // The edge the popup hangs off, pulled inside the alley band so a popup
    // attached to a mostly off-screen anchor still starts in view.
    let attach = match position {
        Position::Top => anchor.top().min(main_extent - alley),
        Position::Bottom => anchor.bottom().max(alley),
        Position::Left => anchor.left().min(main_extent - alley),
        Position::Right => anchor.right().max(alley),
    };
    let available = match position {
        Position::Top | Position::Left => attach - alley,
        Position::Bottom | Position::Right => main_extent - alley - attach,
    };
    let main_fits = main_natural <= available;
    let main = if main_fits { main_natural } else { available };

    let cross_lo = alley;
    let cross_hi = cross_extent - alley;
    let cross_room = cross_hi - cross_lo;
    let cross_fits = cross_natural <= cross_room;
    let cross = if cross_fits { cross_natural } else { cross_room };

    if !(main > 0.0 && cross > 0.0) {
        return None;
    }

    let cross_start = clamp_span(anchor_center - cross / 2.0, cross, cross_lo, cross_hi);
    let anchor_offset = anchor_center - cross_start;
    let offset_valid = anchor_offset >= config.min_anchor_offset
        && anchor_offset <= cross - config.min_anchor_offset;

    let main_start = match position {
        Position::Top | Position::Left => attach - main,
        Position::Bottom | Position::Right => attach,
    };

    let (left, top, width, height) = match axis {
        Axis::Vertical => (cross_start, main_start, cross, main),
        Axis::Horizontal => (main_start, cross_start, main, cross),
    };

    Some(FitResult {
        position,
        top,
        left,
        anchor_offset,
        width,
        height,
        is_perfect_fit: main_fits && cross_fits && offset_valid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> Rect {
        Rect::from_edges(100.0, 100.0, 200.0, 130.0)
    }

    fn placed(evaluation: Evaluation) -> FitResult {
        match evaluation {
            Evaluation::Placed(fit) => fit,
            other => panic!("expected a placement, got {other:?}"),
        }
    }

    #[test]
    fn bottom_fits_and_is_clamped_to_alley() {
        let fit = placed(evaluate(
            anchor(),
            Size::new(300.0, 60.0),
            Size::new(1000.0, 800.0),
            &PriorityList::default(),
            &PlacementConfig::default(),
        ));
        assert_eq!(fit.position, Position::Bottom);
        assert_eq!(fit.top, 130.0);
        assert_eq!(fit.left, 2.0);
        // center line 150, popup shifted from 0 to 2
        assert_eq!(fit.anchor_offset, 148.0);
        assert_eq!((fit.width, fit.height), (300.0, 60.0));
        assert!(fit.is_perfect_fit);
    }

    #[test]
    fn right_only_is_constrained_by_viewport() {
        let fit = placed(evaluate(
            anchor(),
            Size::new(300.0, 60.0),
            Size::new(250.0, 800.0),
            &PriorityList::new([Position::Right]),
            &PlacementConfig::default(),
        ));
        assert_eq!(fit.position, Position::Right);
        assert_eq!(fit.left, 200.0);
        assert_eq!(fit.width, 48.0);
        assert_eq!(fit.height, 60.0);
        assert_eq!(fit.top, 85.0);
        assert_eq!(fit.anchor_offset, 30.0);
        assert!(!fit.is_perfect_fit);
    }

    #[test]
    fn top_placement_sits_above_anchor() {
        let fit = placed(evaluate(
            Rect::new(400.0, 500.0, 100.0, 30.0),
            Size::new(120.0, 80.0),
            Size::new(1000.0, 800.0),
            &PriorityList::new([Position::Top]),
            &PlacementConfig::default(),
        ));
        assert_eq!(fit.top, 420.0);
        assert_eq!(fit.left, 390.0);
        assert_eq!(fit.anchor_offset, 60.0);
        assert!(fit.is_perfect_fit);
    }

    #[test]
    fn left_placement_sits_before_anchor() {
        let fit = placed(evaluate(
            Rect::new(400.0, 500.0, 100.0, 30.0),
            Size::new(120.0, 80.0),
            Size::new(1000.0, 800.0),
            &PriorityList::new([Position::Left]),
            &PlacementConfig::default(),
        ));
        assert_eq!(fit.left, 280.0);
        assert_eq!(fit.top, 475.0);
        assert_eq!(fit.anchor_offset, 40.0);
        assert!(fit.is_perfect_fit);
    }

    #[test]
    fn first_perfect_fit_in_priority_order_wins() {
        let fit = placed(evaluate(
            Rect::new(400.0, 300.0, 100.0, 30.0),
            Size::new(100.0, 60.0),
            Size::new(1000.0, 800.0),
            &PriorityList::new([Position::Left, Position::Bottom]),
            &PlacementConfig::default(),
        ));
        assert_eq!(fit.position, Position::Left);
    }

    #[test]
    fn invalid_offset_revokes_perfect_fit() {
        // Anchor hugs the left edge: Bottom clamps the popup so the pointer
        // would sit 3px from the corner, so Right wins instead.
        let fit = placed(evaluate(
            Rect::new(0.0, 100.0, 10.0, 30.0),
            Size::new(300.0, 60.0),
            Size::new(1000.0, 800.0),
            &PriorityList::new([Position::Bottom, Position::Right]),
            &PlacementConfig::default(),
        ));
        assert_eq!(fit.position, Position::Right);
        assert!(fit.is_perfect_fit);

        let only_bottom = placed(evaluate(
            Rect::new(0.0, 100.0, 10.0, 30.0),
            Size::new(300.0, 60.0),
            Size::new(1000.0, 800.0),
            &PriorityList::new([Position::Bottom]),
            &PlacementConfig::default(),
        ));
        assert_eq!(only_bottom.anchor_offset, 3.0);
        assert!(!only_bottom.is_perfect_fit);
    }

    #[test]
    fn fallback_is_first_partial_fit_with_its_own_geometry() {
        let fit = placed(evaluate(
            anchor(),
            Size::new(300.0, 60.0),
            Size::new(250.0, 160.0),
            &PriorityList::default(),
            &PlacementConfig::default(),
        ));
        assert_eq!(fit.position, Position::Bottom);
        assert_eq!(fit.top, 130.0);
        assert_eq!(fit.height, 28.0);
        assert_eq!(fit.width, 246.0);
        assert_eq!(fit.left, 2.0);
        assert!(!fit.is_perfect_fit);
    }

    #[test]
    fn tiny_viewport_has_no_viable_position() {
        let result = evaluate(
            Rect::new(0.0, 0.0, 3.0, 3.0),
            Size::new(50.0, 50.0),
            Size::new(3.0, 3.0),
            &PriorityList::default(),
            &PlacementConfig::default(),
        );
        assert_eq!(result, Evaluation::NoViablePosition);
        assert!(result.placement().is_none());
    }

    #[test]
    fn degenerate_anchor_dismisses() {
        for anchor in [
            Rect::new(100.0, 100.0, 0.0, 30.0),
            Rect::new(100.0, 100.0, 100.0, 0.0),
        ] {
            let result = evaluate(
                anchor,
                Size::new(300.0, 60.0),
                Size::new(1000.0, 800.0),
                &PriorityList::default(),
                &PlacementConfig::default(),
            );
            assert_eq!(result, Evaluation::Dismiss);
        }
    }

    #[test]
    fn offscreen_anchor_dismisses() {
        for anchor in [
            Rect::new(-200.0, 100.0, 100.0, 30.0),
            Rect::new(1000.0, 100.0, 100.0, 30.0),
            Rect::new(100.0, 900.0, 100.0, 30.0),
        ] {
            let result = evaluate(
                anchor,
                Size::new(300.0, 60.0),
                Size::new(1000.0, 800.0),
                &PriorityList::default(),
                &PlacementConfig::default(),
            );
            assert_eq!(result, Evaluation::Dismiss);
        }
    }

    #[test]
    fn unmeasured_popup_is_a_no_op() {
        let result = evaluate(
            anchor(),
            Size::new(0.0, 60.0),
            Size::new(1000.0, 800.0),
            &PriorityList::default(),
            &PlacementConfig::default(),
        );
        assert_eq!(result, Evaluation::Unmeasured);
    }

    #[test]
    fn wide_popup_is_constrained_on_cross_axis() {
        let fit = placed(evaluate(
            anchor(),
            Size::new(600.0, 60.0),
            Size::new(400.0, 800.0),
            &PriorityList::new([Position::Bottom]),
            &PlacementConfig::default(),
        ));
        assert_eq!(fit.width, 396.0);
        assert_eq!(fit.left, 2.0);
        assert!(!fit.is_perfect_fit);
    }

    #[test]
    fn alley_width_is_configurable() {
        let fit = placed(evaluate(
            anchor(),
            Size::new(300.0, 60.0),
            Size::new(1000.0, 800.0),
            &PriorityList::default(),
            &PlacementConfig::default().alley_width(10.0),
        ));
        assert_eq!(fit.left, 10.0);
        assert_eq!(fit.anchor_offset, 140.0);
    }

    #[test]
    fn fit_result_rect_and_cross_size() {
        let fit = FitResult {
            position: Position::Right,
            top: 1.0,
            left: 2.0,
            anchor_offset: 3.0,
            width: 4.0,
            height: 5.0,
            is_perfect_fit: false,
        };
        assert_eq!(fit.rect(), Rect::new(2.0, 1.0, 4.0, 5.0));
        assert_eq!(fit.cross_size(), 5.0);
    }
}

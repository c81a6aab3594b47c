//! Property-based invariant tests for viewport geometry.
//!
//! ## Invariants
//!
//! 1. `clamp_span` keeps a fitting span inside its range and never moves a
//!    span that already fits.
//! 2. Intersection is symmetric and contained in both operands.
//! 3. Containment implies intersection equals the inner rect.

use proptest::prelude::*;
use tether_core::{Rect, clamp_span};

fn arb_rect() -> impl Strategy<Value = Rect> {
    (-500i32..500, -500i32..500, 1u16..400, 1u16..400)
        .prop_map(|(x, y, w, h)| Rect::new(x as f32, y as f32, f32::from(w), f32::from(h)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // ── 1. clamp_span ─────────────────────────────────────────────────────

    #[test]
    fn fitting_span_is_clamped_into_range(
        start in -2000i32..2000,
        len in 0u16..500,
        lo in -100i32..100,
        extent in 0u16..1000,
    ) {
        let (start, len, lo) = (start as f32, f32::from(len), lo as f32);
        let hi = lo + f32::from(extent);
        let clamped = clamp_span(start, len, lo, hi);
        if len <= hi - lo {
            prop_assert!(clamped >= lo);
            prop_assert!(clamped + len <= hi);
            if start >= lo && start + len <= hi {
                prop_assert_eq!(clamped, start);
            }
        } else {
            prop_assert_eq!(clamped, lo);
        }
    }

    // ── 2. Intersection ───────────────────────────────────────────────────

    #[test]
    fn intersection_is_symmetric(a in arb_rect(), b in arb_rect()) {
        prop_assert_eq!(a.intersection_opt(&b), b.intersection_opt(&a));
        prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        if let Some(i) = a.intersection_opt(&b) {
            prop_assert!(!i.is_degenerate());
            prop_assert!(a.contains_rect(&i));
            prop_assert!(b.contains_rect(&i));
        }
    }

    // ── 3. Containment ────────────────────────────────────────────────────

    #[test]
    fn contained_rect_is_its_own_intersection(outer in arb_rect(), inset in (0u16..50, 0u16..50)) {
        let (dx, dy) = (f32::from(inset.0), f32::from(inset.1));
        let inner = Rect::new(
            outer.x + dx,
            outer.y + dy,
            (outer.width - dx).max(1.0),
            (outer.height - dy).max(1.0),
        );
        prop_assume!(outer.contains_rect(&inner));
        prop_assert_eq!(outer.intersection_opt(&inner), Some(inner));
    }
}

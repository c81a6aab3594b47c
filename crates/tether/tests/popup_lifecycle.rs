#![forbid(unsafe_code)]

//! End-to-end popup lifecycle through the public facade.
//!
//! Run:
//!   cargo test -p tether --test popup_lifecycle

use std::cell::RefCell;
use std::rc::Rc;

use tether::prelude::*;
use tether::runtime::testing::ScriptedHost;
use tether::{Degradation, PopupFrame, ReconcileOutcome};

const BUTTON: ElementHandle = ElementHandle::new(1);
const TOOLTIP: ElementHandle = ElementHandle::new(2);

fn scene() -> ScriptedHost {
    let mut host = ScriptedHost::new(Size::new(1000.0, 800.0));
    host.set_rect(BUTTON, Rect::from_edges(100.0, 100.0, 200.0, 130.0));
    host.set_rect(TOOLTIP, Rect::new(0.0, 0.0, 300.0, 60.0));
    host
}

#[test]
fn tooltip_follows_scrolling_button_until_it_leaves() {
    let mut host = scene();
    let dismissed = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&dismissed);
    let mut popups = PopupRegistry::new().on_auto_dismiss(move |id| log.borrow_mut().push(id));

    let id = popups.show(
        &mut host,
        PopupRequest::new(BUTTON, TOOLTIP, |frame: &PopupFrame| *frame),
    );
    host.flush(&mut popups);

    let frame = popups.rendered(id).copied().expect("rendered");
    assert_eq!(frame.position, Position::Bottom);
    assert_eq!((frame.left, frame.top), (2.0, 130.0));
    assert_eq!(frame.anchor_offset, 148.0);
    assert_eq!((frame.constrained_width, frame.constrained_height), (300.0, 60.0));

    // Scroll the page by 50px; the next tick catches up.
    host.set_rect(BUTTON, Rect::from_edges(100.0, 50.0, 200.0, 80.0));
    let timer = host.timer_handles()[0];
    assert_eq!(popups.on_timer(&mut host, timer), ReconcileOutcome::Requested);
    host.flush(&mut popups);
    assert_eq!(popups.layout(id).map(|l| l.popup_top), Some(80.0));

    // Scroll it out of view entirely.
    host.set_rect(BUTTON, Rect::from_edges(100.0, -80.0, 200.0, -50.0));
    popups.on_timer(&mut host, timer);
    host.flush(&mut popups);

    assert!(!popups.is_active(id));
    assert_eq!(*dismissed.borrow(), vec![id]);
    assert_eq!(host.live_timers(), 0);
    assert_eq!(popups.on_timer(&mut host, timer), ReconcileOutcome::Inactive);
}

#[test]
fn narrow_viewport_falls_back_to_a_shrunk_side() {
    let mut host = ScriptedHost::new(Size::new(250.0, 160.0));
    host.set_rect(BUTTON, Rect::from_edges(100.0, 100.0, 200.0, 130.0));
    host.set_rect(TOOLTIP, Rect::new(0.0, 0.0, 300.0, 60.0));
    let mut popups = PopupRegistry::new();

    let id = popups.show(
        &mut host,
        PopupRequest::new(BUTTON, TOOLTIP, |frame: &PopupFrame| *frame),
    );
    host.flush(&mut popups);

    let layout = popups.layout(id).copied().expect("layout");
    assert_eq!(layout.anchor_position, Position::Bottom);
    assert_eq!(layout.constrained_popup_height, 28.0);
    assert_eq!(layout.constrained_popup_width, 246.0);
    assert_eq!(layout.natural_size(), Size::new(300.0, 60.0));
}

#[test]
fn unknown_popup_errors_degrade_to_discard() {
    let mut host = scene();
    let mut popups = PopupRegistry::<PopupFrame>::new();
    let err: Error = popups
        .dismiss(&mut host, PopupId::new(42))
        .unwrap_err()
        .into();
    assert_eq!(err.degradation(), Degradation::DiscardReply);
    assert!(err.is_recoverable());
}

#![forbid(unsafe_code)]

//! Reconciliation loop for a single popup.
//!
//! A [`PopupTracker`] owns one popup's [`LayoutStore`], its interval timer,
//! and the bookkeeping that turns asynchronous measurement replies into
//! placements.
//!
//! # Lifecycle
//!
//! ```text
//! Measuring ──popup measured──▶ Positioned ──┐
//!     │                            ▲   tick  │
//!     │                            └─────────┘
//!     └──────── anchor gone / dismiss / unmount ──▶ Dismissed (terminal)
//! ```
//!
//! # How a pass works
//!
//! 1. [`mount`](PopupTracker::mount), [`on_tick`](PopupTracker::on_tick) or
//!    [`on_layout_changed`](PopupTracker::on_layout_changed) starts a pass:
//!    the anchor is measured, and the popup too while still `Measuring`.
//! 2. The host answers through [`on_measured`](PopupTracker::on_measured).
//!    Replies for an older pass, or after dismissal, are discarded.
//! 3. Once this pass's anchor rect and the natural size are known, the evaluator
//!    runs and its result is written to the store. Only a store change
//!    re-invokes the popup factory.
//!
//! Measurement errors are never fatal: state is left alone and the next tick
//! retries. A successfully measured anchor that is degenerate or out of view
//! dismisses the popup and fires the auto-dismiss callback once.

use std::fmt;

use tether_core::logging::TARGET;
use tether_core::{ElementHandle, Rect};
use tether_layout::{Evaluation, PriorityList, anchor_in_view, evaluate, evaluate_inner};

use crate::gateway::{
    MeasureResult, MeasureTarget, MeasureTicket, PopupHost, PopupId, TimerHandle,
};
use crate::options::PopupOptions;
use crate::store::{LayoutState, LayoutStore, PopupFrame};

/// Lifecycle phase of a popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the popup's natural size.
    Measuring,
    /// Natural size known; placement tracks the anchor.
    Positioned,
    /// Terminal. No further measurement or rendering.
    Dismissed(DismissReason),
}

/// Why a popup stopped tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    /// The caller dismissed it.
    Explicit,
    /// The anchor became degenerate or left the viewport.
    AnchorUnavailable,
    /// The hosting component went away.
    Unmounted,
}

/// What a tracker call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Measurement requests were issued.
    Requested,
    /// Still waiting on the anchor rect or the natural size.
    Waiting,
    /// The store changed and the popup was re-rendered.
    Updated,
    /// The evaluator reproduced the current layout.
    Unchanged,
    /// No side of the anchor can hold the popup; rendering is suppressed.
    Suppressed,
    /// Measurement failed; the next tick retries.
    RetryLater,
    /// The reply was stale or arrived after dismissal.
    Discarded,
    /// The anchor vanished and the popup dismissed itself.
    AutoDismissed,
    /// The popup is already dismissed.
    Inactive,
}

pub(crate) type Factory<R> = Box<dyn FnMut(&PopupFrame) -> R>;
type DismissCallback = Box<dyn FnMut(PopupId)>;

/// Drives placement of one popup against its anchor.
pub struct PopupTracker<R> {
    id: PopupId,
    anchor: ElementHandle,
    popup: ElementHandle,
    priorities: PriorityList,
    options: PopupOptions,
    factory: Factory<R>,
    on_auto_dismiss: Option<DismissCallback>,
    store: LayoutStore,
    phase: Phase,
    timer: Option<TimerHandle>,
    pass: u64,
    pending_anchor: Option<u64>,
    pending_popup: Option<u64>,
    anchor_rect: Option<Rect>,
    rendered: Option<R>,
}

impl<R> PopupTracker<R> {
    /// Create a tracker. Nothing happens until [`mount`](Self::mount).
    pub fn new(
        id: PopupId,
        anchor: ElementHandle,
        popup: ElementHandle,
        priorities: PriorityList,
        options: PopupOptions,
        factory: impl FnMut(&PopupFrame) -> R + 'static,
    ) -> Self {
        Self::with_factory(id, anchor, popup, priorities, options, Box::new(factory))
    }

    pub(crate) fn with_factory(
        id: PopupId,
        anchor: ElementHandle,
        popup: ElementHandle,
        priorities: PriorityList,
        options: PopupOptions,
        factory: Factory<R>,
    ) -> Self {
        Self {
            id,
            anchor,
            popup,
            priorities,
            options,
            factory,
            on_auto_dismiss: None,
            store: LayoutStore::new(),
            phase: Phase::Measuring,
            timer: None,
            pass: 0,
            pending_anchor: None,
            pending_popup: None,
            anchor_rect: None,
            rendered: None,
        }
    }

    /// Register a callback fired once if the popup dismisses itself.
    #[must_use]
    pub fn with_auto_dismiss(mut self, callback: impl FnMut(PopupId) + 'static) -> Self {
        self.on_auto_dismiss = Some(Box::new(callback));
        self
    }

    #[inline]
    pub fn id(&self) -> PopupId {
        self.id
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the popup is still tracking its anchor.
    #[inline]
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, Phase::Dismissed(_))
    }

    /// Current layout snapshot.
    #[inline]
    pub fn layout(&self) -> &LayoutState {
        self.store.state()
    }

    /// Number of store writes that changed the layout.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// The last renderable produced by the factory, if the popup is showable.
    #[inline]
    pub fn rendered(&self) -> Option<&R> {
        self.rendered.as_ref()
    }

    /// The running interval timer, if any.
    #[inline]
    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    #[inline]
    pub fn options(&self) -> &PopupOptions {
        &self.options
    }

    #[inline]
    pub fn priorities(&self) -> &PriorityList {
        &self.priorities
    }

    /// Start tracking: arm the interval timer and issue the first pass.
    ///
    /// Mounting twice never starts a second timer.
    pub fn mount<H: PopupHost + ?Sized>(&mut self, host: &mut H) -> ReconcileOutcome {
        if !self.is_active() {
            return ReconcileOutcome::Inactive;
        }
        if self.timer.is_none() {
            let handle = host.start_interval(self.options.reconcile_interval);
            self.timer = Some(handle);
            tracing::info!(
                target: TARGET,
                popup = %self.id,
                anchor = %self.anchor,
                timer = handle.raw(),
                interval_ms = self.options.reconcile_interval.as_millis() as u64,
                "popup shown"
            );
        }
        self.begin_pass(host)
    }

    /// Periodic timer callback.
    pub fn on_tick<H: PopupHost + ?Sized>(&mut self, host: &mut H) -> ReconcileOutcome {
        if !self.is_active() {
            return ReconcileOutcome::Inactive;
        }
        self.begin_pass(host)
    }

    /// Something that may affect layout changed (props, state, a resize).
    pub fn on_layout_changed<H: PopupHost + ?Sized>(&mut self, host: &mut H) -> ReconcileOutcome {
        self.on_tick(host)
    }

    /// Feed a measurement reply back in.
    pub fn on_measured<H: PopupHost + ?Sized>(
        &mut self,
        host: &mut H,
        ticket: MeasureTicket,
        result: MeasureResult,
    ) -> ReconcileOutcome {
        if !self.is_active() || ticket.popup != self.id {
            tracing::trace!(
                target: TARGET,
                popup = %self.id,
                target_kind = ticket.target.as_str(),
                pass = ticket.pass,
                "discarding reply for inactive popup"
            );
            return ReconcileOutcome::Discarded;
        }

        let pending = match ticket.target {
            MeasureTarget::Anchor => &mut self.pending_anchor,
            MeasureTarget::Popup => &mut self.pending_popup,
        };
        if *pending != Some(ticket.pass) {
            tracing::trace!(
                target: TARGET,
                popup = %self.id,
                target_kind = ticket.target.as_str(),
                pass = ticket.pass,
                latest = self.pass,
                "discarding stale reply"
            );
            return ReconcileOutcome::Discarded;
        }
        *pending = None;

        let rect = match result {
            Ok(rect) => rect,
            Err(err) => {
                if ticket.target == MeasureTarget::Anchor {
                    self.anchor_rect = None;
                }
                tracing::warn!(
                    target: TARGET,
                    popup = %self.id,
                    target_kind = ticket.target.as_str(),
                    error = %err,
                    "measurement failed, retrying on next tick"
                );
                return ReconcileOutcome::RetryLater;
            }
        };

        match ticket.target {
            MeasureTarget::Popup => self.on_popup_measured(host, rect),
            MeasureTarget::Anchor => self.on_anchor_measured(host, rect),
        }
    }

    /// Dismiss on the caller's request. Returns `false` if already dismissed.
    pub fn dismiss<H: PopupHost + ?Sized>(&mut self, host: &mut H) -> bool {
        self.finish(host, DismissReason::Explicit)
    }

    /// Tear down because the hosting component is going away.
    pub fn unmount<H: PopupHost + ?Sized>(&mut self, host: &mut H) -> bool {
        self.finish(host, DismissReason::Unmounted)
    }

    fn begin_pass<H: PopupHost + ?Sized>(&mut self, host: &mut H) -> ReconcileOutcome {
        self.pass += 1;
        let _span = tracing::debug_span!(
            "popup.reconcile",
            popup = %self.id,
            pass = self.pass,
            measuring = self.store.state().is_measuring_popup,
        )
        .entered();

        self.pending_anchor = Some(self.pass);
        self.anchor_rect = None;
        host.measure_in_viewport(self.anchor, self.ticket(MeasureTarget::Anchor));
        if self.store.state().is_measuring_popup {
            self.pending_popup = Some(self.pass);
            host.measure_in_viewport(self.popup, self.ticket(MeasureTarget::Popup));
        }
        tracing::debug!(
            target: TARGET,
            popup = %self.id,
            pass = self.pass,
            popup_pending = self.pending_popup.is_some(),
            "measurement requested"
        );
        ReconcileOutcome::Requested
    }

    fn ticket(&self, target: MeasureTarget) -> MeasureTicket {
        MeasureTicket {
            popup: self.id,
            target,
            pass: self.pass,
        }
    }

    fn on_popup_measured<H: PopupHost + ?Sized>(
        &mut self,
        host: &mut H,
        rect: Rect,
    ) -> ReconcileOutcome {
        if rect.is_degenerate() {
            tracing::debug!(
                target: TARGET,
                popup = %self.id,
                width = rect.width,
                height = rect.height,
                "popup not laid out yet"
            );
            return ReconcileOutcome::RetryLater;
        }
        if self.store.capture_natural_size(rect.size()).is_changed() {
            self.phase = Phase::Positioned;
            tracing::debug!(
                target: TARGET,
                popup = %self.id,
                width = rect.width,
                height = rect.height,
                "natural size captured"
            );
        }
        if self.pending_anchor.is_some() {
            return ReconcileOutcome::Waiting;
        }
        self.run_evaluator(host)
    }

    fn on_anchor_measured<H: PopupHost + ?Sized>(
        &mut self,
        host: &mut H,
        rect: Rect,
    ) -> ReconcileOutcome {
        let viewport = host.viewport_size();
        if !anchor_in_view(rect, viewport) {
            self.finish(host, DismissReason::AnchorUnavailable);
            return ReconcileOutcome::AutoDismissed;
        }
        self.anchor_rect = Some(rect);
        self.run_evaluator(host)
    }

    fn run_evaluator<H: PopupHost + ?Sized>(&mut self, host: &mut H) -> ReconcileOutcome {
        let Some(anchor) = self.anchor_rect else {
            return ReconcileOutcome::Waiting;
        };
        let state = *self.store.state();
        let evaluation = if self.options.use_inner_positioning {
            evaluate_inner(anchor, state.constrained_size(), &self.priorities)
        } else {
            evaluate(
                anchor,
                state.natural_size(),
                host.viewport_size(),
                &self.priorities,
                &self.options.placement(),
            )
        };

        match evaluation {
            Evaluation::Unmeasured => ReconcileOutcome::Waiting,
            Evaluation::Dismiss => {
                self.finish(host, DismissReason::AnchorUnavailable);
                ReconcileOutcome::AutoDismissed
            }
            Evaluation::NoViablePosition => {
                if self.store.clear_placement().is_changed() {
                    tracing::debug!(target: TARGET, popup = %self.id, "no viable position");
                }
                self.rendered = None;
                ReconcileOutcome::Suppressed
            }
            Evaluation::Placed(fit) => {
                if !self.store.apply_fit(&fit).is_changed() && self.rendered.is_some() {
                    return ReconcileOutcome::Unchanged;
                }
                let state = self.store.state();
                tracing::debug!(
                    target: TARGET,
                    popup = %self.id,
                    position = %state.anchor_position,
                    top = state.popup_top,
                    left = state.popup_left,
                    width = state.constrained_popup_width,
                    height = state.constrained_popup_height,
                    perfect = fit.is_perfect_fit,
                    revision = self.store.revision(),
                    "layout updated"
                );
                let frame = state.frame();
                self.rendered = Some((self.factory)(&frame));
                ReconcileOutcome::Updated
            }
        }
    }

    fn finish<H: PopupHost + ?Sized>(&mut self, host: &mut H, reason: DismissReason) -> bool {
        if !self.is_active() {
            return false;
        }
        if let Some(handle) = self.timer.take() {
            host.cancel_interval(handle);
        }
        self.phase = Phase::Dismissed(reason);
        self.pending_anchor = None;
        self.pending_popup = None;
        self.rendered = None;
        tracing::info!(target: TARGET, popup = %self.id, reason = ?reason, "popup dismissed");

        if reason == DismissReason::AnchorUnavailable {
            if let Some(callback) = self.on_auto_dismiss.as_mut() {
                callback(self.id);
            }
        }
        true
    }
}

impl<R> fmt::Debug for PopupTracker<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupTracker")
            .field("id", &self.id)
            .field("anchor", &self.anchor)
            .field("popup", &self.popup)
            .field("phase", &self.phase)
            .field("timer", &self.timer)
            .field("pass", &self.pass)
            .field("layout", self.store.state())
            .finish_non_exhaustive()
    }
}

impl<R> Drop for PopupTracker<R> {
    fn drop(&mut self) {
        // Cancelling needs the host, which Drop does not have.
        if let Some(handle) = self.timer {
            tracing::warn!(
                target: TARGET,
                popup = %self.id,
                timer = handle.raw(),
                "popup tracker dropped with a live timer; call dismiss or unmount first"
            );
        }
    }
}

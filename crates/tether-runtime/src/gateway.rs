#![forbid(unsafe_code)]

//! The host boundary: asynchronous measurement and interval timers.
//!
//! The engine never talks to a UI toolkit directly. It asks a
//! [`MeasurementGateway`] to measure elements and a [`TickScheduler`] to run
//! an interval timer, and the host reports back by calling into the tracker
//! (or registry) with the [`MeasureTicket`] it was given.
//!
//! Replies may arrive in any order, late, or never. Tickets let the engine
//! tell a current reply from a stale one, so the host needs no cancellation
//! support.

use std::fmt;

use tether_core::{ElementHandle, Rect, Size};
use web_time::Duration;

/// Identifier of one popup instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PopupId(u64);

impl PopupId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PopupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "popup#{}", self.0)
    }
}

/// Which element a measurement request is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureTarget {
    /// The element the popup is attached to.
    Anchor,
    /// The popup itself, rendered off-screen to learn its natural size.
    Popup,
}

impl MeasureTarget {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anchor => "anchor",
            Self::Popup => "popup",
        }
    }
}

/// Correlates a measurement reply with the request that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeasureTicket {
    /// The popup that asked.
    pub popup: PopupId,
    /// What was measured.
    pub target: MeasureTarget,
    /// Reconcile pass the request belongs to. Replies from older passes are stale.
    pub pass: u64,
}

/// Why a measurement produced no rectangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeasureError {
    /// The element was unmounted before it could be measured.
    Unmounted,
    /// The host failed to measure for another reason.
    Failed(String),
}

impl fmt::Display for MeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unmounted => write!(f, "element is no longer mounted"),
            Self::Failed(msg) => write!(f, "measurement failed: {msg}"),
        }
    }
}

impl std::error::Error for MeasureError {}

/// Asynchronous element measurement supplied by the host.
pub trait MeasurementGateway {
    /// Start measuring `element` in viewport coordinates.
    ///
    /// The host must eventually hand `ticket` back together with the result,
    /// or drop the request silently. Must not call back re-entrantly.
    fn measure_in_viewport(&mut self, element: ElementHandle, ticket: MeasureTicket);

    /// Current viewport size.
    fn viewport_size(&self) -> Size;
}

/// Handle to a running interval timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Interval timers supplied by the host.
///
/// When a timer fires, the host calls the owning tracker's `on_tick` (or the
/// registry's `on_timer` with the handle).
pub trait TickScheduler {
    /// Start a repeating timer.
    fn start_interval(&mut self, interval: Duration) -> TimerHandle;

    /// Stop a timer. Cancelling an unknown handle is a no-op.
    fn cancel_interval(&mut self, handle: TimerHandle);
}

/// Everything a tracker needs from its host.
pub trait PopupHost: MeasurementGateway + TickScheduler {}

impl<T: MeasurementGateway + TickScheduler + ?Sized> PopupHost for T {}

/// Result type of a measurement reply.
pub type MeasureResult = Result<Rect, MeasureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display() {
        assert_eq!(PopupId::new(3).to_string(), "popup#3");
        assert_eq!(TimerHandle::new(9).raw(), 9);
        assert_eq!(MeasureTarget::Popup.as_str(), "popup");
    }

    #[test]
    fn measure_error_messages() {
        assert_eq!(
            MeasureError::Unmounted.to_string(),
            "element is no longer mounted"
        );
        assert!(
            MeasureError::Failed("detached".into())
                .to_string()
                .contains("detached")
        );
    }
}

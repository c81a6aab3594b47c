#![forbid(unsafe_code)]

//! Deterministic host double for tests.
//!
//! [`ScriptedHost`] is both a [`MeasurementGateway`] and a [`TickScheduler`].
//! Requests queue up until the test delivers them, either one at a time
//! (`take_requests` + `on_measured`) or all at once with
//! [`flush`](ScriptedHost::flush), which answers from a scene of element
//! rectangles. Elements missing from the scene answer
//! [`MeasureError::Unmounted`].

use std::collections::{BTreeMap, HashMap, VecDeque};

use tether_core::{ElementHandle, Rect, Size};
use web_time::Duration;

use crate::gateway::{
    MeasureError, MeasureResult, MeasureTicket, MeasurementGateway, TickScheduler, TimerHandle,
};
use crate::registry::PopupRegistry;
use crate::tracker::PopupTracker;

/// Something that accepts measurement replies.
pub trait ReplySink {
    fn deliver(&mut self, host: &mut ScriptedHost, ticket: MeasureTicket, result: MeasureResult);
}

impl<R> ReplySink for PopupTracker<R> {
    fn deliver(&mut self, host: &mut ScriptedHost, ticket: MeasureTicket, result: MeasureResult) {
        self.on_measured(host, ticket, result);
    }
}

impl<R> ReplySink for PopupRegistry<R> {
    fn deliver(&mut self, host: &mut ScriptedHost, ticket: MeasureTicket, result: MeasureResult) {
        self.on_measured(host, ticket, result);
    }
}

/// Scripted measurement gateway and timer host.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    viewport: Size,
    scene: HashMap<ElementHandle, Rect>,
    requests: VecDeque<(ElementHandle, MeasureTicket)>,
    timers: BTreeMap<TimerHandle, Duration>,
    next_timer: u64,
    timers_started: usize,
    timers_cancelled: usize,
}

impl ScriptedHost {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Place an element in the scene.
    pub fn set_rect(&mut self, element: ElementHandle, rect: Rect) {
        self.scene.insert(element, rect);
    }

    /// Remove an element from the scene; it will answer `Unmounted`.
    pub fn remove(&mut self, element: ElementHandle) {
        self.scene.remove(&element);
    }

    /// What the scene would answer for `element`.
    pub fn rect_of(&self, element: ElementHandle) -> MeasureResult {
        self.scene
            .get(&element)
            .copied()
            .ok_or(MeasureError::Unmounted)
    }

    pub fn pending_requests(&self) -> usize {
        self.requests.len()
    }

    /// Drain queued requests without answering them.
    pub fn take_requests(&mut self) -> Vec<(ElementHandle, MeasureTicket)> {
        self.requests.drain(..).collect()
    }

    /// Answer every queued request from the scene, in request order.
    ///
    /// Returns the number of replies delivered.
    pub fn flush(&mut self, sink: &mut impl ReplySink) -> usize {
        let mut delivered = 0;
        while let Some((element, ticket)) = self.requests.pop_front() {
            let result = self.rect_of(element);
            sink.deliver(self, ticket, result);
            delivered += 1;
        }
        delivered
    }

    /// Timers currently running.
    pub fn live_timers(&self) -> usize {
        self.timers.len()
    }

    /// Handles of running timers, in creation order.
    pub fn timer_handles(&self) -> Vec<TimerHandle> {
        self.timers.keys().copied().collect()
    }

    pub fn timer_interval(&self, handle: TimerHandle) -> Option<Duration> {
        self.timers.get(&handle).copied()
    }

    pub fn timers_started(&self) -> usize {
        self.timers_started
    }

    pub fn timers_cancelled(&self) -> usize {
        self.timers_cancelled
    }
}

impl MeasurementGateway for ScriptedHost {
    fn measure_in_viewport(&mut self, element: ElementHandle, ticket: MeasureTicket) {
        self.requests.push_back((element, ticket));
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }
}

impl TickScheduler for ScriptedHost {
    fn start_interval(&mut self, interval: Duration) -> TimerHandle {
        self.next_timer += 1;
        let handle = TimerHandle::new(self.next_timer);
        self.timers.insert(handle, interval);
        self.timers_started += 1;
        handle
    }

    fn cancel_interval(&mut self, handle: TimerHandle) {
        if self.timers.remove(&handle).is_some() {
            self.timers_cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{MeasureTarget, PopupId};

    #[test]
    fn timers_are_counted() {
        let mut host = ScriptedHost::new(Size::new(10.0, 10.0));
        let a = host.start_interval(Duration::from_millis(5));
        let b = host.start_interval(Duration::from_millis(7));
        assert_ne!(a, b);
        assert_eq!(host.live_timers(), 2);
        host.cancel_interval(a);
        host.cancel_interval(a);
        assert_eq!(host.live_timers(), 1);
        assert_eq!(host.timers_cancelled(), 1);
        assert_eq!(host.timer_interval(b), Some(Duration::from_millis(7)));
    }

    #[test]
    fn unknown_elements_are_unmounted() {
        let mut host = ScriptedHost::new(Size::new(10.0, 10.0));
        let element = ElementHandle::new(5);
        assert_eq!(host.rect_of(element), Err(MeasureError::Unmounted));
        host.set_rect(element, Rect::new(1.0, 1.0, 2.0, 2.0));
        assert_eq!(host.rect_of(element), Ok(Rect::new(1.0, 1.0, 2.0, 2.0)));
        host.remove(element);
        assert!(host.rect_of(element).is_err());
    }

    #[test]
    fn requests_queue_in_order() {
        let mut host = ScriptedHost::new(Size::new(10.0, 10.0));
        let ticket = |pass| MeasureTicket {
            popup: PopupId::new(1),
            target: MeasureTarget::Anchor,
            pass,
        };
        host.measure_in_viewport(ElementHandle::new(1), ticket(1));
        host.measure_in_viewport(ElementHandle::new(1), ticket(2));
        let drained = host.take_requests();
        assert_eq!(drained.iter().map(|(_, t)| t.pass).collect::<Vec<_>>(), [1, 2]);
        assert_eq!(host.pending_requests(), 0);
    }
}

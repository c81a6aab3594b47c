#![forbid(unsafe_code)]

//! Registry of live popups.
//!
//! [`PopupRegistry`] is the surface the rendering layer talks to: it creates
//! a [`PopupTracker`] per [`show`](PopupRegistry::show), routes measurement
//! replies and timer ticks to the right tracker, and forgets trackers once
//! they are dismissed. Each popup stays independent: its own store, its own
//! timer.
//!
//! # Example
//!
//! ```
//! use tether_core::{ElementHandle, Rect, Size};
//! use tether_runtime::testing::ScriptedHost;
//! use tether_runtime::{PopupRegistry, PopupRequest};
//!
//! let anchor = ElementHandle::new(1);
//! let popup = ElementHandle::new(2);
//! let mut host = ScriptedHost::new(Size::new(1000.0, 800.0));
//! host.set_rect(anchor, Rect::from_edges(100.0, 100.0, 200.0, 130.0));
//! host.set_rect(popup, Rect::new(0.0, 0.0, 300.0, 60.0));
//!
//! let mut registry = PopupRegistry::new();
//! let id = registry.show(&mut host, PopupRequest::new(anchor, popup, |frame| frame.position));
//! host.flush(&mut registry);
//!
//! assert_eq!(registry.layout(id).map(|l| l.popup_top), Some(130.0));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tether_core::ElementHandle;
use tether_core::logging::TARGET;
use tether_layout::PriorityList;

use crate::gateway::{MeasureResult, MeasureTicket, PopupHost, PopupId, TimerHandle};
use crate::options::PopupOptions;
use crate::store::{LayoutState, PopupFrame};
use crate::tracker::{Factory, PopupTracker, ReconcileOutcome};

/// Registry lookup errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// No live popup has this id (never shown, or already dismissed).
    UnknownPopup(PopupId),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPopup(id) => write!(f, "no active popup with id {id}"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Everything needed to show one popup.
pub struct PopupRequest<R> {
    anchor: ElementHandle,
    popup: ElementHandle,
    factory: Factory<R>,
    priorities: Option<PriorityList>,
    options: Option<PopupOptions>,
    key: Option<String>,
}

impl<R> PopupRequest<R> {
    /// `factory` is invoked with the placement each time the layout changes.
    pub fn new(
        anchor: ElementHandle,
        popup: ElementHandle,
        factory: impl FnMut(&PopupFrame) -> R + 'static,
    ) -> Self {
        Self {
            anchor,
            popup,
            factory: Box::new(factory),
            priorities: None,
            options: None,
            key: None,
        }
    }

    /// Sides to try, in order. Defaults to `[Bottom, Right, Top, Left]`.
    #[must_use]
    pub fn priorities(mut self, priorities: PriorityList) -> Self {
        self.priorities = Some(priorities);
        self
    }

    /// Per-popup options. Defaults to the registry's defaults.
    #[must_use]
    pub fn options(mut self, options: PopupOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Showing another popup with the same key replaces this one.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl<R> fmt::Debug for PopupRequest<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupRequest")
            .field("anchor", &self.anchor)
            .field("popup", &self.popup)
            .field("priorities", &self.priorities)
            .field("options", &self.options)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Owner of every live popup.
pub struct PopupRegistry<R> {
    defaults: PopupOptions,
    next_id: u64,
    popups: BTreeMap<PopupId, PopupTracker<R>>,
    keys: HashMap<String, PopupId>,
    timers: HashMap<TimerHandle, PopupId>,
    on_auto_dismiss: Option<Box<dyn FnMut(PopupId)>>,
}

impl<R> Default for PopupRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> PopupRegistry<R> {
    /// A registry using the built-in option defaults.
    pub fn new() -> Self {
        Self {
            defaults: PopupOptions::default(),
            next_id: 0,
            popups: BTreeMap::new(),
            keys: HashMap::new(),
            timers: HashMap::new(),
            on_auto_dismiss: None,
        }
    }

    /// A registry whose popups default to `defaults`.
    ///
    /// Invalid defaults are replaced by the built-in ones.
    pub fn with_defaults(defaults: PopupOptions) -> Self {
        let mut registry = Self::new();
        registry.defaults = sanitize(defaults, PopupOptions::default());
        registry
    }

    /// Callback fired once for each popup that dismisses itself.
    #[must_use]
    pub fn on_auto_dismiss(mut self, callback: impl FnMut(PopupId) + 'static) -> Self {
        self.on_auto_dismiss = Some(Box::new(callback));
        self
    }

    #[inline]
    pub fn defaults(&self) -> &PopupOptions {
        &self.defaults
    }

    /// Start tracking a popup and issue its first measurement pass.
    pub fn show<H: PopupHost + ?Sized>(&mut self, host: &mut H, request: PopupRequest<R>) -> PopupId {
        let PopupRequest {
            anchor,
            popup,
            factory,
            priorities,
            options,
            key,
        } = request;

        if let Some(previous) = key.as_ref().and_then(|k| self.keys.get(k).copied()) {
            tracing::debug!(target: TARGET, popup = %previous, "replacing keyed popup");
            self.dismiss_inner(host, previous);
        }

        self.next_id += 1;
        let id = PopupId::new(self.next_id);
        let options = sanitize(options.unwrap_or(self.defaults), self.defaults);
        let mut tracker = PopupTracker::with_factory(
            id,
            anchor,
            popup,
            priorities.unwrap_or_default(),
            options,
            factory,
        );
        tracker.mount(host);

        if let Some(timer) = tracker.timer() {
            self.timers.insert(timer, id);
        }
        if let Some(key) = key {
            self.keys.insert(key, id);
        }
        self.popups.insert(id, tracker);
        id
    }

    /// Show a popup under `key`, dismissing whatever was shown under it.
    pub fn show_keyed<H: PopupHost + ?Sized>(
        &mut self,
        host: &mut H,
        key: impl Into<String>,
        request: PopupRequest<R>,
    ) -> PopupId {
        self.show(host, request.key(key))
    }

    /// Route a measurement reply to its popup.
    ///
    /// Replies for popups that are gone are discarded.
    pub fn on_measured<H: PopupHost + ?Sized>(
        &mut self,
        host: &mut H,
        ticket: MeasureTicket,
        result: MeasureResult,
    ) -> ReconcileOutcome {
        let Some(tracker) = self.popups.get_mut(&ticket.popup) else {
            tracing::trace!(target: TARGET, popup = %ticket.popup, "reply for unknown popup");
            return ReconcileOutcome::Discarded;
        };
        let outcome = tracker.on_measured(host, ticket, result);
        if outcome == ReconcileOutcome::AutoDismissed {
            self.forget(ticket.popup);
            if let Some(callback) = self.on_auto_dismiss.as_mut() {
                callback(ticket.popup);
            }
        }
        outcome
    }

    /// Route a timer tick to its popup.
    pub fn on_timer<H: PopupHost + ?Sized>(
        &mut self,
        host: &mut H,
        timer: TimerHandle,
    ) -> ReconcileOutcome {
        let Some(id) = self.timers.get(&timer).copied() else {
            return ReconcileOutcome::Inactive;
        };
        self.popups
            .get_mut(&id)
            .map_or(ReconcileOutcome::Inactive, |tracker| tracker.on_tick(host))
    }

    /// Re-run placement for one popup after a layout-affecting change.
    pub fn notify_layout_changed<H: PopupHost + ?Sized>(
        &mut self,
        host: &mut H,
        id: PopupId,
    ) -> Result<ReconcileOutcome, RegistryError> {
        let tracker = self
            .popups
            .get_mut(&id)
            .ok_or(RegistryError::UnknownPopup(id))?;
        Ok(tracker.on_layout_changed(host))
    }

    /// Re-run placement for every popup, e.g. after a window resize.
    pub fn on_viewport_resized<H: PopupHost + ?Sized>(&mut self, host: &mut H) {
        let viewport = host.viewport_size();
        tracing::debug!(
            target: TARGET,
            width = viewport.width,
            height = viewport.height,
            popups = self.popups.len(),
            "viewport resized"
        );
        for tracker in self.popups.values_mut() {
            tracker.on_layout_changed(host);
        }
    }

    /// Dismiss a popup and cancel its timer.
    pub fn dismiss<H: PopupHost + ?Sized>(
        &mut self,
        host: &mut H,
        id: PopupId,
    ) -> Result<(), RegistryError> {
        if self.dismiss_inner(host, id) {
            Ok(())
        } else {
            Err(RegistryError::UnknownPopup(id))
        }
    }

    /// Dismiss the popup registered under `key`, if any.
    pub fn dismiss_keyed<H: PopupHost + ?Sized>(&mut self, host: &mut H, key: &str) -> bool {
        match self.keys.get(key).copied() {
            Some(id) => self.dismiss_inner(host, id),
            None => false,
        }
    }

    /// Dismiss every popup.
    pub fn dismiss_all<H: PopupHost + ?Sized>(&mut self, host: &mut H) {
        let ids: Vec<PopupId> = self.popups.keys().copied().collect();
        for id in ids {
            self.dismiss_inner(host, id);
        }
    }

    #[inline]
    pub fn is_active(&self, id: PopupId) -> bool {
        self.popups.contains_key(&id)
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.popups.len()
    }

    /// Ids of live popups in creation order.
    pub fn ids(&self) -> impl Iterator<Item = PopupId> + '_ {
        self.popups.keys().copied()
    }

    /// The popup registered under `key`.
    pub fn keyed(&self, key: &str) -> Option<PopupId> {
        self.keys.get(key).copied()
    }

    pub fn layout(&self, id: PopupId) -> Option<&LayoutState> {
        self.popups.get(&id).map(PopupTracker::layout)
    }

    pub fn rendered(&self, id: PopupId) -> Option<&R> {
        self.popups.get(&id).and_then(PopupTracker::rendered)
    }

    pub fn tracker(&self, id: PopupId) -> Option<&PopupTracker<R>> {
        self.popups.get(&id)
    }

    fn dismiss_inner<H: PopupHost + ?Sized>(&mut self, host: &mut H, id: PopupId) -> bool {
        let Some(mut tracker) = self.forget(id) else {
            return false;
        };
        tracker.dismiss(host)
    }

    /// Drop all bookkeeping for `id`, returning its tracker.
    fn forget(&mut self, id: PopupId) -> Option<PopupTracker<R>> {
        let tracker = self.popups.remove(&id)?;
        self.timers.retain(|_, owner| *owner != id);
        self.keys.retain(|_, owner| *owner != id);
        Some(tracker)
    }
}

impl<R> fmt::Debug for PopupRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupRegistry")
            .field("defaults", &self.defaults)
            .field("popups", &self.popups)
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

fn sanitize(options: PopupOptions, fallback: PopupOptions) -> PopupOptions {
    match options.validate() {
        Ok(()) => options,
        Err(err) => {
            tracing::warn!(target: TARGET, error = %err, "invalid popup options, using defaults");
            fallback
        }
    }
}

#![forbid(unsafe_code)]

//! Tether public facade crate.
//!
//! Popups that stay attached to the element that opened them. This crate
//! re-exports the types a host needs from the internal crates and offers a
//! prelude for day-to-day use.
//!
//! # Quick start
//!
//! ```
//! use tether::prelude::*;
//! use tether::runtime::testing::ScriptedHost;
//!
//! let anchor = ElementHandle::new(1);
//! let menu = ElementHandle::new(2);
//!
//! // A real host measures its own elements; the scripted one answers from a
//! // table of rectangles.
//! let mut host = ScriptedHost::new(Size::new(400.0, 300.0));
//! host.set_rect(anchor, Rect::from_edges(350.0, 20.0, 390.0, 40.0));
//! host.set_rect(menu, Rect::new(0.0, 0.0, 120.0, 80.0));
//!
//! let mut popups = PopupRegistry::new();
//! let id = popups.show(
//!     &mut host,
//!     PopupRequest::new(anchor, menu, |frame: &PopupFrame| frame.position)
//!         .priorities("right, bottom".parse()?),
//! );
//! host.flush(&mut popups);
//!
//! // Not enough room on the right, so the menu opens below.
//! assert_eq!(popups.rendered(id), Some(&Position::Bottom));
//! # Ok::<(), tether::Error>(())
//! ```

pub mod error;

// --- Core re-exports -------------------------------------------------------

pub use tether_core::{ElementHandle, Rect, Size, clamp_span};

// --- Layout re-exports -----------------------------------------------------

pub use tether_layout::{
    Axis, DEFAULT_ALLEY_WIDTH, DEFAULT_MIN_ANCHOR_OFFSET, Evaluation, FitResult, PlacementConfig,
    Position, PriorityError, PriorityList, anchor_in_view, evaluate, evaluate_inner,
};

// --- Runtime re-exports ----------------------------------------------------

pub use tether_runtime::{
    ConfigError, DEFAULT_RECONCILE_INTERVAL, DismissReason, LayoutState, MeasureError,
    MeasureResult, MeasureTarget, MeasureTicket, MeasurementGateway, Phase, PopupFrame, PopupHost,
    PopupId, PopupOptions, PopupRegistry, PopupRequest, PopupTracker, ReconcileOutcome,
    RegistryError, TickScheduler, TimerHandle,
};

#[cfg(feature = "test-helpers")]
pub use tether_runtime::testing;

// --- Errors ---------------------------------------------------------------

pub use error::{Degradation, Error, Result};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ElementHandle, Error, MeasureError, MeasureTicket, MeasurementGateway, PopupFrame,
        PopupHost, PopupId, PopupOptions, PopupRegistry, PopupRequest, Position, PriorityList,
        Rect, Result, Size, TickScheduler, TimerHandle,
    };

    pub use crate::{core, layout, runtime};
}

pub use tether_core as core;
pub use tether_layout as layout;
pub use tether_runtime as runtime;

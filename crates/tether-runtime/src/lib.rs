#![forbid(unsafe_code)]

//! Tether Runtime
//!
//! This crate turns the pure placement math in `tether-layout` into live,
//! self-correcting popups.
//!
//! # Key Components
//!
//! - [`PopupRegistry`] - Owner of every live popup; the host-facing surface
//! - [`PopupTracker`] - Reconciliation loop for a single popup
//! - [`LayoutStore`] - Change-detecting holder of one popup's [`LayoutState`]
//! - [`MeasurementGateway`] / [`TickScheduler`] - What the host must provide
//! - [`PopupOptions`] - Per-popup tuning, loadable from TOML/JSON with `config`
//!
//! # Role in tether
//! `tether-runtime` is the orchestrator. It asks the host to measure anchors
//! and popups, feeds the replies through the evaluator, and re-renders a popup
//! only when its layout actually changed. A periodic timer per popup keeps
//! placement correct when the anchor moves without any event being raised.
//!
//! # How it fits in the system
//! The host answers measurement requests and fires timers; everything else
//! happens here. Measurement is asynchronous: requests go out through
//! [`MeasurementGateway::measure_in_viewport`] and the answers come back
//! through [`PopupRegistry::on_measured`], tagged with a [`MeasureTicket`] so
//! late replies can be recognized and dropped.

pub mod gateway;
pub mod options;
pub mod registry;
pub mod store;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;
pub mod tracker;

pub use gateway::{
    MeasureError, MeasureResult, MeasureTarget, MeasureTicket, MeasurementGateway, PopupHost,
    PopupId, TickScheduler, TimerHandle,
};
pub use options::{ConfigError, DEFAULT_RECONCILE_INTERVAL, PopupOptions};
pub use registry::{PopupRegistry, PopupRequest, RegistryError};
pub use store::{LayoutState, LayoutStore, PopupFrame, StoreUpdate};
pub use tracker::{DismissReason, Phase, PopupTracker, ReconcileOutcome};

#![forbid(unsafe_code)]

//! Core: viewport geometry and opaque element handles.
//!
//! # Role in tether
//! `tether-core` is the leaf crate. It owns the [`Rect`](geometry::Rect) and
//! [`Size`](geometry::Size) types every other crate speaks, plus the
//! [`ElementHandle`](handle::ElementHandle) capability the host hands to its
//! measurement gateway.
//!
//! # How it fits in the system
//! The layout crate (`tether-layout`) runs pure placement math over these
//! types. The runtime (`tether-runtime`) drives measurement and
//! reconciliation, and never needs to know what a host element really is.

pub mod geometry;
pub mod handle;
pub mod logging;

pub use geometry::{Rect, Size, clamp_span};
pub use handle::ElementHandle;

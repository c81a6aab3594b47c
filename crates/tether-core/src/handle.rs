#![forbid(unsafe_code)]

//! Opaque references to host elements.

use std::fmt;

/// An opaque reference to an element owned by the host UI.
///
/// The engine never dereferences a handle. It only passes it back to the
/// host's measurement gateway, which knows how to resolve it (a widget id,
/// a DOM node index, a native view tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(u64);

impl ElementHandle {
    /// Wrap a host-defined element identifier.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The host-defined identifier.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for ElementHandle {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

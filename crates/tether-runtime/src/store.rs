#![forbid(unsafe_code)]

//! Layout state store.
//!
//! [`LayoutStore`] holds the one snapshot a popup exposes to the rendering
//! layer. Every write goes through a structural equality check, so feeding it
//! the same placement twice is a no-op and never triggers a re-render.

use tether_core::{Rect, Size};
use tether_layout::{FitResult, Position};

/// The engine's externally visible layout snapshot for one popup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutState {
    /// The popup is rendered invisibly so its natural size can be measured.
    pub is_measuring_popup: bool,
    /// Side of the anchor the popup is on.
    pub anchor_position: Position,
    /// Distance from the popup's near edge to the anchor's center line.
    pub anchor_offset: f32,
    pub popup_top: f32,
    pub popup_left: f32,
    /// Natural width, captured once.
    pub popup_width: f32,
    /// Natural height, captured once.
    pub popup_height: f32,
    /// Width actually rendered.
    pub constrained_popup_width: f32,
    /// Height actually rendered.
    pub constrained_popup_height: f32,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            is_measuring_popup: true,
            anchor_position: Position::Bottom,
            anchor_offset: 0.0,
            popup_top: 0.0,
            popup_left: 0.0,
            popup_width: 0.0,
            popup_height: 0.0,
            constrained_popup_width: 0.0,
            constrained_popup_height: 0.0,
        }
    }
}

impl LayoutState {
    /// Natural size of the popup.
    #[inline]
    pub fn natural_size(&self) -> Size {
        Size::new(self.popup_width, self.popup_height)
    }

    /// Size the popup is rendered at.
    #[inline]
    pub fn constrained_size(&self) -> Size {
        Size::new(self.constrained_popup_width, self.constrained_popup_height)
    }

    /// Where the popup is drawn.
    #[inline]
    pub fn popup_rect(&self) -> Rect {
        Rect::new(
            self.popup_left,
            self.popup_top,
            self.constrained_popup_width,
            self.constrained_popup_height,
        )
    }

    /// Whether there is something to show.
    ///
    /// False while measuring and after the evaluator found no viable side.
    #[inline]
    pub fn is_viable(&self) -> bool {
        !self.is_measuring_popup && !self.constrained_size().is_empty()
    }

    /// The arguments handed to the popup factory.
    pub fn frame(&self) -> PopupFrame {
        PopupFrame {
            position: self.anchor_position,
            anchor_offset: self.anchor_offset,
            constrained_width: self.constrained_popup_width,
            constrained_height: self.constrained_popup_height,
            top: self.popup_top,
            left: self.popup_left,
        }
    }
}

/// What the popup factory is told about its placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupFrame {
    pub position: Position,
    pub anchor_offset: f32,
    pub constrained_width: f32,
    pub constrained_height: f32,
    pub top: f32,
    pub left: f32,
}

/// Whether a store write changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreUpdate {
    Changed,
    Unchanged,
}

impl StoreUpdate {
    #[inline]
    pub fn is_changed(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Owner of one popup's [`LayoutState`].
#[derive(Debug, Clone, Default)]
pub struct LayoutStore {
    state: LayoutState,
    revision: u64,
}

impl LayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot.
    #[inline]
    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    /// Number of writes that changed the snapshot.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Record the popup's natural size and leave the measuring state.
    ///
    /// The natural size is immutable afterwards: later calls, and calls with
    /// an empty size, return [`StoreUpdate::Unchanged`].
    pub fn capture_natural_size(&mut self, size: Size) -> StoreUpdate {
        if !self.state.is_measuring_popup || size.is_empty() {
            return StoreUpdate::Unchanged;
        }
        self.commit(LayoutState {
            is_measuring_popup: false,
            popup_width: size.width,
            popup_height: size.height,
            constrained_popup_width: size.width,
            constrained_popup_height: size.height,
            ..self.state
        })
    }

    /// Write a placement chosen by an evaluator.
    ///
    /// Rendered size is capped at the natural size. Ignored while measuring.
    pub fn apply_fit(&mut self, fit: &FitResult) -> StoreUpdate {
        if self.state.is_measuring_popup {
            return StoreUpdate::Unchanged;
        }
        self.commit(LayoutState {
            anchor_position: fit.position,
            anchor_offset: fit.anchor_offset,
            popup_top: fit.top,
            popup_left: fit.left,
            constrained_popup_width: fit.width.min(self.state.popup_width),
            constrained_popup_height: fit.height.min(self.state.popup_height),
            ..self.state
        })
    }

    /// Collapse the rendered size to zero: nowhere to put the popup.
    pub fn clear_placement(&mut self) -> StoreUpdate {
        if self.state.is_measuring_popup {
            return StoreUpdate::Unchanged;
        }
        self.commit(LayoutState {
            constrained_popup_width: 0.0,
            constrained_popup_height: 0.0,
            ..self.state
        })
    }

    fn commit(&mut self, next: LayoutState) -> StoreUpdate {
        if next == self.state {
            return StoreUpdate::Unchanged;
        }
        self.state = next;
        self.revision += 1;
        StoreUpdate::Changed
    }
}

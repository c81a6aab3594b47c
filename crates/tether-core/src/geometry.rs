#![forbid(unsafe_code)]

//! Geometric primitives.

/// An axis-aligned rectangle in viewport coordinates.
///
/// Units are logical pixels with the origin at the top-left of the viewport.
/// Coordinates may be negative when an element is scrolled partially out of
/// view. `right` and `bottom` are derived, so `right == left + width` always
/// holds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its four edges.
    #[inline]
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Horizontal center line.
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical center line.
    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Width and height as a [`Size`].
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether the rectangle has no usable area.
    ///
    /// Hosts report degenerate rects for elements that are not laid out yet
    /// or have been removed. NaN dimensions count as degenerate.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0) || !self.x.is_finite() || !self.y.is_finite()
    }

    /// Whether the two rectangles share a region of positive area.
    ///
    /// Rectangles that only touch along an edge do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection_opt(other).is_some()
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::from_edges(x, y, right, bottom))
        } else {
            None
        }
    }

    /// Whether `other` lies entirely inside this rectangle (edges inclusive).
    #[inline]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Shift the rectangle by the given deltas.
    #[inline]
    #[must_use]
    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero, negative, or NaN.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// The `[0, 0, width, height]` rectangle.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }
}

impl From<(f32, f32)> for Size {
    fn from((width, height): (f32, f32)) -> Self {
        Self::new(width, height)
    }
}

/// Shift a 1-D span so that `[start, start + len]` lies inside `[lo, hi]`.
///
/// Returns the adjusted start. When the span is longer than the range it is
/// pinned to `lo`.
#[inline]
pub fn clamp_span(start: f32, len: f32, lo: f32, hi: f32) -> f32 {
    let max_start = hi - len;
    if max_start < lo {
        return lo;
    }
    start.max(lo).min(max_start)
}

#![forbid(unsafe_code)]

//! Anchor sides and the ordered list of sides to try.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The side of the anchor on which the popup is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Above the anchor.
    Top,
    /// Below the anchor.
    #[default]
    Bottom,
    /// Left of the anchor.
    Left,
    /// Right of the anchor.
    Right,
}

/// A layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The other axis.
    #[inline]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

impl Position {
    /// All four sides, in the default priority order.
    pub const ALL: [Position; 4] = [Self::Bottom, Self::Right, Self::Top, Self::Left];

    /// The axis along which the popup moves away from the anchor.
    ///
    /// Size on this axis is what gets constrained when space runs out.
    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Top | Self::Bottom => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }

    /// The side facing this one.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Lower-case name, as accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = PriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| PriorityError::UnknownPosition(name.to_string()))
    }
}

/// Errors produced while parsing priority lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriorityError {
    /// A name that is not one of `top`, `bottom`, `left`, `right`.
    UnknownPosition(String),
}

impl fmt::Display for PriorityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPosition(name) => write!(
                f,
                "unknown popup position {name:?} (expected top, bottom, left or right)"
            ),
        }
    }
}

impl std::error::Error for PriorityError {}

/// Ordered, duplicate-free list of sides to try.
///
/// Never empty: an empty input falls back to `[Bottom, Right, Top, Left]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Position>", into = "Vec<Position>")]
pub struct PriorityList {
    entries: Vec<Position>,
}

impl PriorityList {
    /// Build a list, keeping the first occurrence of each side.
    pub fn new(positions: impl IntoIterator<Item = Position>) -> Self {
        let mut entries: Vec<Position> = Vec::with_capacity(4);
        for position in positions {
            if !entries.contains(&position) {
                entries.push(position);
            }
        }
        if entries.is_empty() {
            return Self::default();
        }
        Self { entries }
    }

    /// Parse a comma-separated list such as `"right, top"`.
    ///
    /// Blank entries are skipped, so `""` yields the default list.
    pub fn parse(s: &str) -> Result<Self, PriorityError> {
        let positions = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(Position::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(positions))
    }

    /// The highest-priority side.
    #[inline]
    pub fn first(&self) -> Position {
        self.entries.first().copied().unwrap_or_default()
    }

    /// Sides in priority order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.entries.iter().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Position] {
        &self.entries
    }
}

impl Default for PriorityList {
    fn default() -> Self {
        Self {
            entries: Position::ALL.to_vec(),
        }
    }
}

impl From<Vec<Position>> for PriorityList {
    fn from(positions: Vec<Position>) -> Self {
        Self::new(positions)
    }
}

impl From<PriorityList> for Vec<Position> {
    fn from(list: PriorityList) -> Self {
        list.entries
    }
}

impl FromIterator<Position> for PriorityList {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl FromStr for PriorityList {
    type Err = PriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#![forbid(unsafe_code)]

//! Geometric primitives.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A pixel rectangle for layout bounds and hit testing.
///
/// Uses viewport coordinates (origin at top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u32,
    /// Top edge (inclusive).
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Length of the rectangle along `axis`.
    #[inline]
    pub const fn length(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Length of the rectangle across `axis`.
    #[inline]
    pub const fn cross_length(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.height,
            Axis::Vertical => self.width,
        }
    }

    /// Cut a slice of this rectangle along `axis`.
    ///
    /// `offset` is relative to the rectangle's own origin on that axis. The
    /// slice is clipped to the rectangle, so an out-of-range slice comes back
    /// empty instead of spilling past the parent bounds.
    pub fn slice(&self, axis: Axis, offset: u32, length: u32) -> Rect {
        let total = self.length(axis);
        let start = offset.min(total);
        let length = length.min(total - start);
        match axis {
            Axis::Horizontal => Rect::new(self.x.saturating_add(start), self.y, length, self.height),
            Axis::Vertical => Rect::new(self.x, self.y.saturating_add(start), self.width, length),
        }
    }
}

/// A point in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Signed displacement from `origin` to `self` along `axis`.
    #[inline]
    pub fn delta_from(&self, origin: Point, axis: Axis) -> i32 {
        let (to, from) = match axis {
            Axis::Horizontal => (self.x, origin.x),
            Axis::Vertical => (self.y, origin.y),
        };
        let delta = i64::from(to) - i64::from(from);
        delta.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

/// The single axis a container negotiates sizes along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Axis {
    /// Left to right; tracks are columns.
    #[default]
    Horizontal,
    /// Top to bottom; tracks are rows.
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    #[inline]
    pub const fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Lowercase name, as used in layout descriptions.
    pub const fn as_str(self) -> &'static str {
        match self {
            Axis::Horizontal => "horizontal",
            Axis::Vertical => "vertical",
        }
    }
}

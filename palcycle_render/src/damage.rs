// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Destination-space damage tracking for partial presentation.

/// An axis-aligned rectangle of destination pixels, half-open on the max
/// side.
///
/// `max_x` and `max_y` are one past the last damaged column and row, so
/// `max_x - min_x` is the width. A rectangle with `min >= max` on either axis
/// is empty; [`EMPTY`](Self::EMPTY) is the canonical one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DamageRect {
    /// Leftmost damaged column.
    pub min_x: i32,
    /// Topmost damaged row.
    pub min_y: i32,
    /// One past the rightmost damaged column.
    pub max_x: i32,
    /// One past the bottom damaged row.
    pub max_y: i32,
}

impl DamageRect {
    /// No damage. `min` is greater than `max` on both axes, so the union with
    /// any rectangle is that rectangle.
    pub const EMPTY: Self = Self {
        min_x: i32::MAX,
        min_y: i32::MAX,
        max_x: i32::MIN,
        max_y: i32::MIN,
    };

    /// Creates a rectangle from its edges.
    #[must_use]
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Whether the rectangle covers no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.min_x >= self.max_x || self.min_y >= self.max_y
    }

    /// Width in pixels; 0 when empty.
    #[must_use]
    pub const fn width(self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.max_x.abs_diff(self.min_x)
        }
    }

    /// Height in pixels; 0 when empty.
    #[must_use]
    pub const fn height(self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.max_y.abs_diff(self.min_y)
        }
    }

    /// The smallest rectangle covering both. Empty inputs are ignored.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Clips to `[0, width] × [0, height]`, returning [`EMPTY`](Self::EMPTY)
    /// if nothing is left.
    #[must_use]
    pub fn clip(self, width: u32, height: u32) -> Self {
        let clipped = Self {
            min_x: self.min_x.max(0),
            min_y: self.min_y.max(0),
            max_x: self.max_x.min(i32::try_from(width).unwrap_or(i32::MAX)),
            max_y: self.max_y.min(i32::try_from(height).unwrap_or(i32::MAX)),
        };
        if clipped.is_empty() {
            Self::EMPTY
        } else {
            clipped
        }
    }

    /// The rectangle as `[min_x, min_y, max_x, max_y]`.
    #[must_use]
    pub const fn to_array(self) -> [i32; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }
}

impl Default for DamageRect {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// What a presenter must mark as damaged after a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DamageRegion {
    /// The whole buffer changed.
    #[default]
    Full,
    /// Only this rectangle changed. Never empty.
    Rect(DamageRect),
    /// Nothing changed; the previous buffer can stay on screen.
    None,
}

impl DamageRegion {
    /// Wraps a rectangle, mapping an empty one to [`None`](Self::None).
    #[must_use]
    pub fn from_rect(rect: DamageRect) -> Self {
        if rect.is_empty() {
            Self::None
        } else {
            Self::Rect(rect)
        }
    }

    /// Returns `true` if no region needs redrawing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Merges another damage region into this one.
    pub fn merge(&mut self, other: &Self) {
        match (*self, *other) {
            (Self::Full, _) | (_, Self::Full) => *self = Self::Full,
            (Self::None, _) => *self = *other,
            (_, Self::None) => {}
            (Self::Rect(a), Self::Rect(b)) => *self = Self::Rect(a.union(b)),
        }
    }
}

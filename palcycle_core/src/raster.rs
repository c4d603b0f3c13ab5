// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoded indexed-color rasters.
//!
//! An [`IndexedRaster`] is the durable result of decoding: one palette index
//! per pixel, a 256-entry [`Palette`], and the color-cycle ranges that
//! animate it.
//!
//! # Pixel index lists
//!
//! Cycling only changes palette *values*; which pixels reference a range's
//! palette entries never changes after decode. So each range gets a
//! [`PixelIndexList`] built once from a full scan: the offsets of every pixel
//! whose index falls in the range, and their bounding box. Delta rendering
//! walks these lists instead of rescanning the image, so its cost is
//! proportional to the number of animated pixels.
//!
//! Each list also carries the range's animation state: the 14-bit phase
//! accumulator advanced by [`IndexedRaster::tick`] and a `damaged` flag that
//! the tick sets and the presenting consumer clears with
//! [`IndexedRaster::take_damage`].

use alloc::vec::Vec;
use core::ops::{Index, RangeInclusive};

use crate::color::Color;
use crate::error::FormatError;
use crate::iff::PALETTE_ENTRIES;

/// A 256-entry color table.
#[derive(Clone, PartialEq, Eq)]
pub struct Palette([Color; PALETTE_ENTRIES]);

impl Palette {
    /// Wraps 256 colors.
    #[must_use]
    pub const fn new(colors: [Color; PALETTE_ENTRIES]) -> Self {
        Self(colors)
    }

    /// A palette of opaque black entries.
    #[must_use]
    pub const fn black() -> Self {
        Self([Color::BLACK; PALETTE_ENTRIES])
    }

    /// All 256 entries.
    #[must_use]
    pub const fn colors(&self) -> &[Color; PALETTE_ENTRIES] {
        &self.0
    }

    /// Sets one entry.
    pub fn set(&mut self, index: u8, color: Color) {
        self.0[usize::from(index)] = color;
    }

    /// Rotates `entries` right by `steps`: the entry at the high end wraps to
    /// the low end and the rest move up.
    pub(crate) fn rotate_right(&mut self, entries: RangeInclusive<u8>, steps: usize) {
        let span = &mut self.0[usize::from(*entries.start())..=usize::from(*entries.end())];
        let steps = steps % span.len();
        span.rotate_right(steps);
    }
}

impl Index<u8> for Palette {
    type Output = Color;

    #[inline]
    fn index(&self, index: u8) -> &Color {
        &self.0[usize::from(index)]
    }
}

impl core::fmt::Debug for Palette {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// A contiguous palette range that cycles at a fixed rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CycleRange {
    low: u8,
    high: u8,
    rate: u16,
}

impl CycleRange {
    /// Creates a range over `low..=high` advancing `rate` phase units per
    /// tick.
    ///
    /// Returns `None` if `low > high` or `rate` is zero; such ranges never
    /// cycle.
    #[must_use]
    pub const fn new(low: u8, high: u8, rate: u16) -> Option<Self> {
        if low > high || rate == 0 {
            None
        } else {
            Some(Self { low, high, rate })
        }
    }

    /// First palette index.
    #[must_use]
    pub const fn low(self) -> u8 {
        self.low
    }

    /// Last palette index (inclusive).
    #[must_use]
    pub const fn high(self) -> u8 {
        self.high
    }

    /// Phase increment per tick.
    #[must_use]
    pub const fn rate(self) -> u16 {
        self.rate
    }

    /// Whether `index` falls in the range.
    #[inline]
    #[must_use]
    pub const fn contains(self, index: u8) -> bool {
        self.low <= index && index <= self.high
    }

    /// The palette indices as an inclusive range.
    #[must_use]
    pub const fn indices(self) -> RangeInclusive<u8> {
        self.low..=self.high
    }
}

/// Inclusive bounding box in source-raster pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelBounds {
    /// Leftmost column.
    pub min_x: u32,
    /// Topmost row.
    pub min_y: u32,
    /// Rightmost column.
    pub max_x: u32,
    /// Bottom row.
    pub max_y: u32,
}

impl PixelBounds {
    /// A box covering one pixel.
    #[must_use]
    pub const fn point(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// Grows the box to include `(x, y)`.
    pub fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// The smallest box covering both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Precomputed pixels and animation state for one cycle range.
#[derive(Clone, Debug, Default)]
pub struct PixelIndexList {
    offsets: Vec<u32>,
    bounds: Option<PixelBounds>,
    pub(crate) phase: u16,
    pub(crate) damaged: bool,
}

impl PixelIndexList {
    /// Scans `pixels` (row-major, `width` per row) for indices in `range`.
    fn scan(pixels: &[u8], width: u32, range: CycleRange) -> Self {
        let mut offsets = Vec::new();
        let mut bounds: Option<PixelBounds> = None;
        let mut offset = 0_u32;

        for (y, row) in (0_u32..).zip(pixels.chunks_exact(width as usize)) {
            for (x, &index) in (0_u32..).zip(row) {
                if range.contains(index) {
                    offsets.push(offset);
                    match &mut bounds {
                        Some(b) => b.include(x, y),
                        None => bounds = Some(PixelBounds::point(x, y)),
                    }
                }
                offset += 1;
            }
        }

        Self {
            offsets,
            bounds,
            phase: 0,
            damaged: false,
        }
    }

    /// Row-major offsets into the raster's pixel buffer, ascending.
    #[must_use]
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// Bounding box of the listed pixels, or `None` if the range is unused.
    #[must_use]
    pub const fn bounds(&self) -> Option<PixelBounds> {
        self.bounds
    }

    /// Progress toward the next rotation, in `0..16384`.
    #[must_use]
    pub const fn phase(&self) -> u16 {
        self.phase
    }

    /// Whether the range rotated since the damage was last taken.
    #[must_use]
    pub const fn is_damaged(&self) -> bool {
        self.damaged
    }
}

/// A decoded indexed-color image with its color-cycle ranges.
#[derive(Clone, Debug)]
pub struct IndexedRaster {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) palette: Palette,
    pub(crate) pixels: Vec<u8>,
    pub(crate) ranges: Vec<CycleRange>,
    pub(crate) range_state: Vec<PixelIndexList>,
    pub(crate) frame_count: u64,
}

impl IndexedRaster {
    /// Assembles a raster and precomputes one [`PixelIndexList`] per range.
    ///
    /// # Errors
    ///
    /// - [`FormatError::EmptyImage`] if `width` or `height` is zero.
    /// - [`FormatError::ImageTooLarge`] if `width * height` exceeds
    ///   `u32::MAX`.
    /// - [`FormatError::PixelCount`] if `pixels` is not `width * height`
    ///   long.
    pub fn from_parts(
        width: u32,
        height: u32,
        palette: Palette,
        pixels: Vec<u8>,
        ranges: Vec<CycleRange>,
    ) -> Result<Self, FormatError> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(FormatError::PixelCount {
                expected,
                actual: pixels.len(),
            });
        }

        let range_state = ranges
            .iter()
            .map(|&range| PixelIndexList::scan(&pixels, width, range))
            .collect();

        Ok(Self {
            width,
            height,
            palette,
            pixels,
            ranges,
            range_state,
            frame_count: 0,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The current (possibly rotated) palette.
    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Palette indices, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Cycle ranges, in file order.
    #[must_use]
    pub fn ranges(&self) -> &[CycleRange] {
        &self.ranges
    }

    /// Per-range pixel lists, parallel to [`ranges`](Self::ranges).
    #[must_use]
    pub fn range_states(&self) -> &[PixelIndexList] {
        &self.range_state
    }

    /// Number of ticks so far that changed at least one palette entry.
    ///
    /// Consumers that do not drive the animation compare this with the last
    /// value they presented to find out whether they are behind.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Whether the raster has anything to animate.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        !self.ranges.is_empty()
    }

    /// The palette index at `(x, y)`, or `None` outside the raster.
    #[must_use]
    pub fn index_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = y as usize * self.width as usize + x as usize;
        self.pixels.get(offset).copied()
    }

    /// The current color at `(x, y)`, or `None` outside the raster.
    #[must_use]
    pub fn color_at(&self, x: u32, y: u32) -> Option<Color> {
        self.index_at(x, y).map(|index| self.palette[index])
    }

    /// Clears the damaged flag of range `range`, returning its old value.
    ///
    /// Returns `false` for an out-of-range index.
    pub fn take_damage(&mut self, range: usize) -> bool {
        self.range_state
            .get_mut(range)
            .is_some_and(|state| core::mem::take(&mut state.damaged))
    }

    /// Whether any range is waiting to be redrawn.
    #[must_use]
    pub fn has_damage(&self) -> bool {
        self.range_state.iter().any(PixelIndexList::is_damaged)
    }
}

/// `width * height` as a buffer length.
pub(crate) fn pixel_count(width: u32, height: u32) -> Result<usize, FormatError> {
    if width == 0 || height == 0 {
        return Err(FormatError::EmptyImage);
    }
    usize::try_from(width)
        .ok()
        .zip(usize::try_from(height).ok())
        .and_then(|(w, h)| w.checked_mul(h))
        // Pixel index lists store offsets as `u32`.
        .filter(|&n| u32::try_from(n).is_ok())
        .ok_or(FormatError::ImageTooLarge)
}

// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Destination pixel buffers.

use core::fmt;

use palcycle_core::color::Color;

/// A canvas could not be created over the given memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanvasError {
    /// The buffer is shorter than `stride * (height - 1) + width` pixels.
    TooSmall {
        /// Pixels required.
        needed: usize,
        /// Pixels available.
        available: usize,
    },
    /// A byte buffer is not 4-byte aligned.
    Misaligned,
    /// The stride is narrower than a row, or not a whole number of pixels.
    BadStride,
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooSmall { needed, available } => {
                write!(f, "buffer holds {available} pixels, {needed} required")
            }
            Self::Misaligned => f.write_str("buffer is not aligned to 4 bytes"),
            Self::BadStride => f.write_str("stride is shorter than a row or not pixel-sized"),
        }
    }
}

impl core::error::Error for CanvasError {}

/// A mutable view of `ARGB8888` pixels.
///
/// Rows are `stride` pixels apart; only the first `width` pixels of each row
/// belong to the visible area. Renderers never touch the padding between
/// rows or anything past the last visible pixel.
pub struct Canvas<'a> {
    pixels: &'a mut [u32],
    width: u32,
    height: u32,
    stride: usize,
}

impl fmt::Debug for Canvas<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .finish_non_exhaustive()
    }
}

impl<'a> Canvas<'a> {
    /// A canvas with tightly packed rows.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::TooSmall`] if `pixels` cannot hold the area.
    pub fn new(pixels: &'a mut [u32], width: u32, height: u32) -> Result<Self, CanvasError> {
        Self::with_stride(pixels, width, height, width as usize)
    }

    /// A canvas whose rows start `stride` pixels apart.
    ///
    /// # Errors
    ///
    /// - [`CanvasError::BadStride`] if `stride < width`.
    /// - [`CanvasError::TooSmall`] if `pixels` cannot hold the area.
    pub fn with_stride(
        pixels: &'a mut [u32],
        width: u32,
        height: u32,
        stride: usize,
    ) -> Result<Self, CanvasError> {
        let row = width as usize;
        if stride < row {
            return Err(CanvasError::BadStride);
        }
        let needed = match height {
            0 => 0,
            h => (h as usize - 1)
                .checked_mul(stride)
                .and_then(|n| n.checked_add(row))
                .ok_or(CanvasError::TooSmall {
                    needed: usize::MAX,
                    available: pixels.len(),
                })?,
        };
        if pixels.len() < needed {
            return Err(CanvasError::TooSmall {
                needed,
                available: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
            stride,
        })
    }

    /// A canvas over raw bytes, such as a mapped shared-memory buffer.
    ///
    /// Pixels are native-endian `u32`s. Trailing bytes that do not make up a
    /// whole pixel are ignored.
    ///
    /// # Errors
    ///
    /// - [`CanvasError::BadStride`] if `stride_bytes` is not a multiple of 4
    ///   or is shorter than a row.
    /// - [`CanvasError::Misaligned`] if `bytes` is not 4-byte aligned.
    /// - [`CanvasError::TooSmall`] if `bytes` cannot hold the area.
    pub fn from_bytes(
        bytes: &'a mut [u8],
        width: u32,
        height: u32,
        stride_bytes: usize,
    ) -> Result<Self, CanvasError> {
        const PIXEL: usize = size_of::<u32>();
        if stride_bytes % PIXEL != 0 {
            return Err(CanvasError::BadStride);
        }
        let whole = bytes.len() - bytes.len() % PIXEL;
        let pixels: &mut [u32] = bytemuck::try_cast_slice_mut(&mut bytes[..whole])
            .map_err(|_| CanvasError::Misaligned)?;
        Self::with_stride(pixels, width, height, stride_bytes / PIXEL)
    }

    /// Visible width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Visible height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Distance between row starts, in pixels.
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// The visible pixels of row `y`.
    ///
    /// # Panics
    ///
    /// If `y >= height`.
    #[must_use]
    pub fn row(&self, y: u32) -> &[u32] {
        let start = y as usize * self.stride;
        &self.pixels[start..start + self.width as usize]
    }

    /// The visible pixels of row `y`, mutably.
    ///
    /// # Panics
    ///
    /// If `y >= height`.
    pub fn row_mut(&mut self, y: u32) -> &mut [u32] {
        let start = y as usize * self.stride;
        &mut self.pixels[start..start + self.width as usize]
    }

    /// The pixel at `(x, y)`, or `None` outside the visible area.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.row(y)[x as usize])
    }

    /// Fills the visible area with one color.
    pub fn clear(&mut self, color: Color) {
        let argb = color.to_argb8888();
        for y in 0..self.height {
            self.row_mut(y).fill(argb);
        }
    }

    /// Fills the square block of `size` pixels at `(x, y)`, clipped to the
    /// visible area.
    pub(crate) fn fill_block(&mut self, x: i64, y: i64, size: i64, argb: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + size).min(i64::from(self.width));
        let y1 = (y + size).min(i64::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let (cols, rows) = (to_index(x0)..to_index(x1), to_index(y0)..to_index(y1));
        for row in rows {
            let start = row * self.stride;
            self.pixels[start + cols.start..start + cols.end].fill(argb);
        }
    }
}

/// Converts an already clipped, non-negative coordinate.
pub(crate) fn to_index(v: i64) -> usize {
    usize::try_from(v).unwrap_or(0)
}

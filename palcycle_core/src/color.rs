// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packed palette colors.

use core::fmt;

/// An 8-bit-per-channel ARGB color.
///
/// Channels are kept separate in memory; [`to_argb8888`](Self::to_argb8888)
/// is the one place they are packed into the destination pixel format.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Alpha.
    pub a: u8,
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        a: 0,
        r: 0,
        g: 0,
        b: 0,
    };

    /// An opaque color from its red, green and blue channels.
    #[inline]
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { a: 0xff, r, g, b }
    }

    /// Packs the color as `0xAARRGGBB`.
    ///
    /// Stored as a native-endian `u32`, this is the `ARGB8888` layout used by
    /// shared-memory display buffers.
    #[inline]
    #[must_use]
    pub const fn to_argb8888(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Unpacks a `0xAARRGGBB` value.
    #[inline]
    #[must_use]
    pub const fn from_argb8888(argb: u32) -> Self {
        let [a, r, g, b] = argb.to_be_bytes();
        Self { a, r, g, b }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{:08x})", self.to_argb8888())
    }
}

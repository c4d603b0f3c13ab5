// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer scaling and centering of an image on an output.
//!
//! Color-cycling art is low resolution and relies on crisp pixels, so images
//! are only ever scaled by whole numbers. [`place`] picks the scale for a
//! destination size and a [`FitMode`], then centers the scaled image. The
//! result is a [`Placement`], which the renderers use to map source pixels to
//! destination blocks.

use core::fmt;
use core::str::FromStr;

use kurbo::Rect;

/// How the integer scale is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum FitMode {
    /// Scale 1, centered.
    Center,
    /// Grow until the image comes within the margin of either edge pair.
    #[default]
    Fit,
    /// Grow until the image comes within the margin of both edge pairs.
    Fill,
}

impl FitMode {
    /// The mode's name as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Fit => "fit",
            Self::Fill => "fill",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitMode {
    type Err = ParseFitModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" => Ok(Self::Center),
            "fit" => Ok(Self::Fit),
            "fill" => Ok(Self::Fill),
            _ => Err(ParseFitModeError),
        }
    }
}

/// A string that names no [`FitMode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseFitModeError;

impl fmt::Display for ParseFitModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown fit mode, expected one of: center, fit, fill")
    }
}

impl core::error::Error for ParseFitModeError {}

/// Layout parameters for one output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutConfig {
    /// How the scale is chosen.
    pub mode: FitMode,
    /// Slack in destination pixels: a scale whose centered origin is within
    /// `margin` of the edge is accepted even if it does not fill the output.
    pub margin: i32,
}

impl LayoutConfig {
    /// The default margin in destination pixels.
    pub const DEFAULT_MARGIN: i32 = 100;

    /// A config with the given mode and the default margin.
    #[must_use]
    pub const fn with_mode(mode: FitMode) -> Self {
        Self {
            mode,
            margin: Self::DEFAULT_MARGIN,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::with_mode(FitMode::Fit)
    }
}

/// Where a source raster lands in a destination buffer.
///
/// Source pixel `(sx, sy)` covers the destination block starting at
/// `(sx * scale + origin_x, sy * scale + origin_y)`, `scale` pixels on a side.
/// Origins may be negative; renderers clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    origin_x: i32,
    origin_y: i32,
    scale: i32,
}

impl Placement {
    /// Scale 1 at the destination origin.
    pub const IDENTITY: Self = Self {
        origin_x: 0,
        origin_y: 0,
        scale: 1,
    };

    /// Creates a placement.
    ///
    /// Returns `None` if `scale` is not positive.
    #[must_use]
    pub const fn new(origin_x: i32, origin_y: i32, scale: i32) -> Option<Self> {
        if scale <= 0 {
            return None;
        }
        Some(Self {
            origin_x,
            origin_y,
            scale,
        })
    }

    /// Destination column of source column 0.
    #[inline]
    #[must_use]
    pub const fn origin_x(self) -> i32 {
        self.origin_x
    }

    /// Destination row of source row 0.
    #[inline]
    #[must_use]
    pub const fn origin_y(self) -> i32 {
        self.origin_y
    }

    /// Destination pixels per source pixel, along each axis. Always at least 1.
    #[inline]
    #[must_use]
    pub const fn scale(self) -> i32 {
        self.scale
    }

    /// The destination area covered by an `image_width × image_height`
    /// raster, before clipping.
    #[must_use]
    pub fn dest_rect(self, image_width: u32, image_height: u32) -> Rect {
        let scale = f64::from(self.scale);
        let x0 = f64::from(self.origin_x);
        let y0 = f64::from(self.origin_y);
        Rect::new(
            x0,
            y0,
            x0 + f64::from(image_width) * scale,
            y0 + f64::from(image_height) * scale,
        )
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Chooses scale and origin for an image on a destination of the given size.
///
/// Starting at scale 1, the image is centered; [`FitMode::Center`] stops
/// there. Otherwise the scale grows by one until the centered origin is
/// within `config.margin` of the edge on either axis ([`FitMode::Fit`]) or on
/// both axes ([`FitMode::Fill`]). An image already larger than the
/// destination stays at scale 1 with a negative origin.
///
/// Zero-sized images are placed at scale 1, origin 0.
#[must_use]
pub fn place(
    image_width: u32,
    image_height: u32,
    dst_width: u32,
    dst_height: u32,
    config: &LayoutConfig,
) -> Placement {
    if image_width == 0 || image_height == 0 {
        return Placement::IDENTITY;
    }

    let (iw, ih) = (i64::from(image_width), i64::from(image_height));
    let (dw, dh) = (i64::from(dst_width), i64::from(dst_height));
    let margin = i64::from(config.margin);

    let mut scale: i64 = 1;
    loop {
        let ox = (dw - iw * scale) / 2;
        let oy = (dh - ih * scale) / 2;

        let done = match config.mode {
            FitMode::Center => true,
            FitMode::Fit => ox <= margin || oy <= margin,
            FitMode::Fill => ox <= margin && oy <= margin,
        };
        // Origins shrink by at least half a pixel per step, so this ends long
        // before the i32 range is exhausted.
        if done || scale >= i64::from(i32::MAX) {
            return Placement {
                origin_x: clamp_i32(ox),
                origin_y: clamp_i32(oy),
                scale: clamp_i32(scale),
            };
        }
        scale += 1;
    }
}

fn clamp_i32(v: i64) -> i32 {
    i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
}

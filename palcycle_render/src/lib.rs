// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Blitting of color-cycling rasters into packed-pixel buffers.
//!
//! This crate sits between [`palcycle_core`]'s animated
//! [`IndexedRaster`](palcycle_core::raster::IndexedRaster) and whatever
//! presents pixels on screen. It provides:
//!
//! - [`Canvas`] — a view of `ARGB8888` destination memory
//! - [`render_full`] — paint the whole raster at an integer scale and offset
//! - [`render_delta`] / [`render_ranges`] — repaint only cycling pixels and
//!   report the damaged rectangle
//! - [`DamageRect`] / [`DamageRegion`] — what the presenter must mark dirty
//! - [`OutputSurface`] — per-output state implementing the driver/follower
//!   discipline for rasters shown on several outputs
//!
//! After every tick, [`render_delta`] leaves the buffer exactly as
//! [`render_full`] would have.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod canvas;
mod damage;
mod delta;
mod full;
mod surface;

pub use canvas::{Canvas, CanvasError};
pub use damage::{DamageRect, DamageRegion};
pub use delta::{render_delta, render_ranges};
pub use full::render_full;
pub use surface::{OutputSurface, Role, SurfaceConfig};

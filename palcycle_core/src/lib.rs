// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! IFF/ILBM decoding and palette-cycling state for color-cycling animations.
//!
//! `palcycle_core` turns a legacy indexed-color bitmap with color-cycle
//! ranges into an [`IndexedRaster`](raster::IndexedRaster) and advances its
//! palette animation one tick at a time. It is `no_std` compatible (with
//! `alloc`); file loading is behind the `std` feature.
//!
//! # Architecture
//!
//! Data flows one way at load time and in a loop at animation time:
//!
//! ```text
//!   bytes ──► iff::parse_chunk() ──► Chunk tree
//!                                       │
//!                 ┌─────────────────────┘
//!                 ▼
//!   ilbm::decode() ──► byterun::unpack() ──► IndexedRaster
//!                                              (palette, pixels,
//!                                               ranges, PixelIndexLists)
//!
//!   tick ──► IndexedRaster::tick() ──► palette rotated, ranges damaged
//!                                          │
//!                 ┌────────────────────────┘
//!                 ▼
//!   palcycle_render::render_delta() ──► destination pixels + damage
//! ```
//!
//! **[`iff`]** — Chunk parser for the IFF container. Produces an owned,
//! write-once tree that borrows payload bytes from the input.
//!
//! **[`byterun`]** — The `ByteRun1` run-length codec used by `BODY` chunks.
//!
//! **[`ilbm`]** — Walks the chunk tree and builds the raster.
//!
//! **[`raster`]** — [`IndexedRaster`](raster::IndexedRaster) and the
//! per-range [`PixelIndexList`](raster::PixelIndexList) precomputation.
//!
//! **[`cycle`]** — The palette-cycle engine: 14-bit phase accumulators and
//! circular palette rotation.
//!
//! **[`color`]** — Packed ARGB color value type.
//!
//! **[`layout`]** — Integer scale and centering of an image on an output.
//!
//! **[`pacing`]** — Converts frame-callback timestamps into due ticks.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types,
//! with zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables [`ilbm::decode_file`] and `std`
//!   support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod byterun;
pub mod color;
pub mod cycle;
pub mod error;
pub mod iff;
pub mod ilbm;
pub mod layout;
pub mod output;
pub mod pacing;
pub mod raster;
pub mod trace;

#[cfg(test)]
mod testing;

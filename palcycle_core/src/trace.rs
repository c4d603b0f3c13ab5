// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for decoding and the animation loop.
//!
//! This module provides a [`TraceSink`] trait with one method per event. The
//! decoder, the cycle engine and the renderer call it at each stage. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.

use crate::byterun::Compression;
use crate::iff::Tag;
use crate::output::OutputId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Why a cycle range was left out of the raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DropReason {
    /// The rate was zero or negative, so the range never moves.
    NotCycling,
    /// `low` was greater than `high`.
    Inverted,
}

/// Which compositor path produced a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderKind {
    /// Every destination pixel covered by the image was written.
    Full,
    /// Only pixels of cycling ranges were written.
    Delta,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted once per successful decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeEvent {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// How the body was stored.
    pub compression: Compression,
    /// Ranges kept for cycling.
    pub ranges: usize,
    /// Ranges dropped (see [`RangeDropEvent`]).
    pub dropped_ranges: usize,
    /// Chunks with tags the decoder does not use.
    pub skipped_chunks: usize,
}

/// Emitted for each chunk the decoder ignores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkSkipEvent {
    /// The chunk's tag.
    pub tag: Tag,
    /// Payload length, padded to even.
    pub len: u32,
}

/// Emitted for each cycle range excluded from the raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeDropEvent {
    /// Position among all `CRNG` chunks in the file.
    pub index: usize,
    /// First palette index as stored.
    pub low: u8,
    /// Last palette index as stored.
    pub high: u8,
    /// Rate as stored.
    pub rate: i16,
    /// Why the range was dropped.
    pub reason: DropReason,
}

/// Emitted by a tick that rotated at least one range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleEvent {
    /// The raster's frame count after the tick.
    pub frame_count: u64,
    /// Ranges that rotated during the tick.
    pub rotated_ranges: usize,
}

/// Emitted when a frame is painted into a destination buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderEvent {
    /// The output being painted.
    pub output: OutputId,
    /// Which compositor path ran.
    pub kind: RenderKind,
    /// Ranges painted (0 for full renders).
    pub ranges: usize,
    /// Source pixels written (each covers a `scale × scale` block).
    pub pixels: usize,
    /// Damaged area in destination pixels, as
    /// `[min_x, min_y, max_x, max_y]` with the max side exclusive.
    pub damage: [i32; 4],
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from decoding and animation.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after an image decodes successfully.
    fn on_decode(&mut self, e: &DecodeEvent) {
        _ = e;
    }

    /// Called for each chunk the decoder skips.
    fn on_chunk_skip(&mut self, e: &ChunkSkipEvent) {
        _ = e;
    }

    /// Called for each cycle range dropped during decode.
    fn on_range_drop(&mut self, e: &RangeDropEvent) {
        _ = e;
    }

    /// Called after a tick that changed the palette.
    fn on_cycle(&mut self, e: &CycleEvent) {
        _ = e;
    }

    /// Called after a frame is painted.
    fn on_render(&mut self, e: &RenderEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`DecodeEvent`].
    #[inline]
    pub fn decode(&mut self, e: &DecodeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_decode(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ChunkSkipEvent`].
    #[inline]
    pub fn chunk_skip(&mut self, e: &ChunkSkipEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_chunk_skip(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RangeDropEvent`].
    #[inline]
    pub fn range_drop(&mut self, e: &RangeDropEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_range_drop(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CycleEvent`].
    #[inline]
    pub fn cycle(&mut self, e: &CycleEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_cycle(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RenderEvent`].
    #[inline]
    pub fn render(&mut self, e: &RenderEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_render(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

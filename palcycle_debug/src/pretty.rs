// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use palcycle_core::trace::{
    ChunkSkipEvent, CycleEvent, DecodeEvent, DropReason, RangeDropEvent, RenderEvent,
    RenderKind, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    cycles: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("cycles", &self.cycles)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            cycles: true,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            cycles: true,
        }
    }

    /// Whether to print a line for every tick that rotated the palette.
    ///
    /// At 60 Hz these dominate the output, so long sessions usually turn them
    /// off.
    #[must_use]
    pub fn with_cycles(mut self, cycles: bool) -> Self {
        self.cycles = cycles;
        self
    }

    /// Consumes the sink, returning the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn reason_name(reason: DropReason) -> &'static str {
    match reason {
        DropReason::NotCycling => "rate<=0",
        DropReason::Inverted => "low>high",
    }
}

fn kind_name(kind: RenderKind) -> &'static str {
    match kind {
        RenderKind::Full => "full",
        RenderKind::Delta => "delta",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_decode(&mut self, e: &DecodeEvent) {
        let _ = writeln!(
            self.writer,
            "[decode] {}x{} compression={:?} ranges={} dropped={} skipped={}",
            e.width, e.height, e.compression, e.ranges, e.dropped_ranges, e.skipped_chunks,
        );
    }

    fn on_chunk_skip(&mut self, e: &ChunkSkipEvent) {
        let _ = writeln!(self.writer, "[skip] {} len={}", e.tag, e.len);
    }

    fn on_range_drop(&mut self, e: &RangeDropEvent) {
        let _ = writeln!(
            self.writer,
            "[range:drop] #{} {}..={} rate={} ({})",
            e.index,
            e.low,
            e.high,
            e.rate,
            reason_name(e.reason),
        );
    }

    fn on_cycle(&mut self, e: &CycleEvent) {
        if !self.cycles {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[cycle] frame={} rotated={}",
            e.frame_count, e.rotated_ranges,
        );
    }

    fn on_render(&mut self, e: &RenderEvent) {
        let [x0, y0, x1, y1] = e.damage;
        if x0 >= x1 || y0 >= y1 {
            let _ = writeln!(
                self.writer,
                "[render:{}] output={} ranges={} pixels={} damage=none",
                kind_name(e.kind),
                e.output.0,
                e.ranges,
                e.pixels,
            );
            return;
        }
        let _ = writeln!(
            self.writer,
            "[render:{}] output={} ranges={} pixels={} damage={}x{}+{}+{}",
            kind_name(e.kind),
            e.output.0,
            e.ranges,
            e.pixels,
            x1.abs_diff(x0),
            y1.abs_diff(y0),
            x0,
            y0,
        );
    }
}

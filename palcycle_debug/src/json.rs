// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON-lines trace output.
//!
//! [`JsonLinesSink`] writes one JSON object per event, one per line, so a
//! session log can be filtered with line tools or loaded into a notebook.
//! Every object carries an `"event"` field naming the event type.

use std::io::{self, Write};

use serde_json::{Value, json};

use palcycle_core::trace::{
    ChunkSkipEvent, CycleEvent, DecodeEvent, DropReason, RangeDropEvent, RenderEvent,
    RenderKind, TraceSink,
};

/// Writes one JSON object per trace event.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> std::fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// The first write error, if any. Events after a failed write are
    /// dropped.
    #[must_use]
    pub fn error(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    /// Flushes and returns the destination, or the first write error.
    ///
    /// # Errors
    ///
    /// Returns the first error from writing or flushing.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn emit(&mut self, value: &Value) {
        if self.error.is_some() {
            return;
        }
        let result = serde_json::to_writer(&mut self.writer, value)
            .map_err(io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(err) = result {
            self.error = Some(err);
        }
    }
}

fn reason_name(reason: DropReason) -> &'static str {
    match reason {
        DropReason::NotCycling => "not_cycling",
        DropReason::Inverted => "inverted",
    }
}

fn kind_name(kind: RenderKind) -> &'static str {
    match kind {
        RenderKind::Full => "full",
        RenderKind::Delta => "delta",
    }
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_decode(&mut self, e: &DecodeEvent) {
        self.emit(&json!({
            "event": "decode",
            "width": e.width,
            "height": e.height,
            "compression": format!("{:?}", e.compression),
            "ranges": e.ranges,
            "dropped_ranges": e.dropped_ranges,
            "skipped_chunks": e.skipped_chunks,
        }));
    }

    fn on_chunk_skip(&mut self, e: &ChunkSkipEvent) {
        self.emit(&json!({
            "event": "chunk_skip",
            "tag": e.tag.to_string(),
            "len": e.len,
        }));
    }

    fn on_range_drop(&mut self, e: &RangeDropEvent) {
        self.emit(&json!({
            "event": "range_drop",
            "index": e.index,
            "low": e.low,
            "high": e.high,
            "rate": e.rate,
            "reason": reason_name(e.reason),
        }));
    }

    fn on_cycle(&mut self, e: &CycleEvent) {
        self.emit(&json!({
            "event": "cycle",
            "frame_count": e.frame_count,
            "rotated_ranges": e.rotated_ranges,
        }));
    }

    fn on_render(&mut self, e: &RenderEvent) {
        let [x0, y0, x1, y1] = e.damage;
        let damage = if x0 >= x1 || y0 >= y1 {
            Value::Null
        } else {
            json!({ "x": x0, "y": y0, "width": x1 - x0, "height": y1 - y0 })
        };
        self.emit(&json!({
            "event": "render",
            "output": e.output.0,
            "kind": kind_name(e.kind),
            "ranges": e.ranges,
            "pixels": e.pixels,
            "damage": damage,
        }));
    }
}

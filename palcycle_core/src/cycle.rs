// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The palette-cycle engine.
//!
//! Every range carries a 14-bit fixed-point phase accumulator. Each tick adds
//! the range's rate to it; every time it passes [`PHASE_MODULUS`] the range's
//! palette entries rotate one step to the right (the entry at `high` wraps
//! around to `low`). A rate of 16384 therefore rotates on every tick, 8192 on
//! every other tick, and so on.
//!
//! The engine knows nothing about wall-clock time: one call to
//! [`IndexedRaster::tick`] is one tick. Hosts decide the cadence, usually with
//! a [`CyclePacer`](crate::pacing::CyclePacer) at the nominal 60 Hz.

use crate::raster::IndexedRaster;
use crate::trace::{CycleEvent, Tracer};

/// Phase accumulator resolution in bits.
pub const PHASE_BITS: u32 = 14;

/// One full turn of the phase accumulator.
pub const PHASE_MODULUS: u32 = 1 << PHASE_BITS;

impl IndexedRaster {
    /// Advances every range by one tick.
    ///
    /// Returns `true` if any palette entry changed. In that case the rotated
    /// ranges are marked damaged and [`frame_count`](Self::frame_count) goes
    /// up by one.
    ///
    /// A range rotates once for every full turn its phase completes, so rates
    /// above 16384 can step a range more than once in a single tick.
    pub fn tick(&mut self) -> bool {
        self.tick_with(&mut Tracer::none())
    }

    /// Like [`tick`](Self::tick), reporting a
    /// [`CycleEvent`](crate::trace::CycleEvent) when something rotated.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "phase is reduced modulo 2^14 and rotations are at most 4"
    )]
    pub fn tick_with(&mut self, tracer: &mut Tracer<'_>) -> bool {
        let mut rotated_ranges = 0;

        for (range, state) in self.ranges.iter().zip(&mut self.range_state) {
            let sum = u32::from(state.phase) + u32::from(range.rate());
            state.phase = (sum % PHASE_MODULUS) as u16;

            let rotations = sum / PHASE_MODULUS;
            if rotations > 0 {
                self.palette
                    .rotate_right(range.indices(), rotations as usize);
                state.damaged = true;
                rotated_ranges += 1;
            }
        }

        if rotated_ranges == 0 {
            return false;
        }

        self.frame_count += 1;
        tracer.cycle(&CycleEvent {
            frame_count: self.frame_count,
            rotated_ranges,
        });
        true
    }
}

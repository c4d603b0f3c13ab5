// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversion of frame-callback timestamps into cycle ticks.
//!
//! Cycle rates are defined against a fixed 60 Hz tick, but outputs refresh at
//! whatever rate they like and skip callbacks while hidden. [`CyclePacer`]
//! turns the millisecond timestamps delivered with each frame callback into
//! the number of ticks due since the previous callback, so that a 144 Hz
//! output mostly runs zero or one tick per frame and a 30 Hz output runs two.
//!
//! Timestamps are `u32` milliseconds with an undefined base that wraps about
//! every 49.7 days; only differences are used.

/// Pacer configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacerConfig {
    /// Ticks per second.
    pub rate_hz: u32,
    /// Most ticks a single frame may run; the rest are dropped. Zero means no
    /// limit.
    pub max_ticks_per_frame: u32,
}

impl PacerConfig {
    /// 60 ticks per second, at most four per frame.
    pub const NOMINAL: Self = Self {
        rate_hz: 60,
        max_ticks_per_frame: 4,
    };
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self::NOMINAL
    }
}

/// Tracks elapsed time between frames and yields due ticks.
///
/// Time is accumulated exactly in units of `1 / (1000 * rate_hz)` seconds, so
/// no drift builds up however the frame intervals fall.
#[derive(Clone, Debug)]
pub struct CyclePacer {
    config: PacerConfig,
    last_ms: Option<u32>,
    /// Sub-tick remainder, in milliseconds times `rate_hz`.
    remainder: u64,
    dropped: u64,
}

impl CyclePacer {
    /// Creates a pacer that has not seen a frame yet.
    #[must_use]
    pub const fn new(config: PacerConfig) -> Self {
        Self {
            config,
            last_ms: None,
            remainder: 0,
            dropped: 0,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> PacerConfig {
        self.config
    }

    /// Returns the number of ticks due at `now_ms`.
    ///
    /// The first call establishes the time base and returns 1 so the first
    /// frame animates immediately.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "capped to max_ticks_per_frame or bounded by u32::MAX * rate_hz / 1000"
    )]
    pub fn advance(&mut self, now_ms: u32) -> u32 {
        let Some(last) = self.last_ms.replace(now_ms) else {
            return 1;
        };

        let elapsed = u64::from(now_ms.wrapping_sub(last));
        let total = elapsed * u64::from(self.config.rate_hz) + self.remainder;
        let due = total / 1000;
        self.remainder = total % 1000;

        let cap = u64::from(self.config.max_ticks_per_frame);
        if cap != 0 && due > cap {
            self.dropped += due - cap;
            return cap as u32;
        }
        due.min(u64::from(u32::MAX)) as u32
    }

    /// Forgets the time base; the next [`advance`](Self::advance) returns 1.
    ///
    /// Hosts call this after the output was hidden long enough that catching
    /// up makes no sense.
    pub fn reset(&mut self) {
        self.last_ms = None;
        self.remainder = 0;
    }

    /// Ticks discarded so far because a frame was due more than
    /// `max_ticks_per_frame`.
    #[must_use]
    pub const fn dropped_ticks(&self) -> u64 {
        self.dropped
    }
}

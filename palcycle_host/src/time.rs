// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host clock reads in frame-callback units.
//!
//! Display protocols stamp frame callbacks with a wrapping `u32` millisecond
//! counter, usually derived from `CLOCK_MONOTONIC`. [`now_millis`] produces
//! the same kind of value for hosts that have to pace frames themselves (the
//! first frame, or a timer fallback while an output is hidden).

use rustix::time::{ClockId as PosixClockId, Timespec, clock_gettime};

const MILLIS_PER_SECOND: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;

/// Clock source for millisecond timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Clock {
    /// `CLOCK_MONOTONIC`.
    #[default]
    Monotonic,
    /// A clock announced by the compositor (e.g. through a presentation-time
    /// protocol) so timestamps share its base.
    Posix(PosixClockId),
}

impl Clock {
    #[must_use]
    const fn posix_clock_id(self) -> PosixClockId {
        match self {
            Self::Monotonic => PosixClockId::Monotonic,
            Self::Posix(clock_id) => clock_id,
        }
    }

    /// Reads the clock as a wrapping millisecond counter.
    #[must_use]
    pub fn now_millis(self) -> u32 {
        timespec_to_millis(clock_gettime(self.posix_clock_id()))
    }
}

/// Returns the monotonic clock as a wrapping millisecond counter.
#[must_use]
pub fn now_millis() -> u32 {
    Clock::Monotonic.now_millis()
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "frame-callback timestamps wrap at 2^32 milliseconds"
)]
fn timespec_to_millis(timespec: Timespec) -> u32 {
    let seconds = u64::try_from(timespec.tv_sec).unwrap_or(0);
    let nanos = u64::try_from(timespec.tv_nsec)
        .unwrap_or(0)
        .min(999_999_999);

    let millis = seconds
        .wrapping_mul(MILLIS_PER_SECOND)
        .wrapping_add(nanos / NANOS_PER_MILLI);
    millis as u32
}

#[cfg(test)]
mod tests {
    use super::{Clock, now_millis, timespec_to_millis};
    use rustix::time::{ClockId as PosixClockId, Timespec};

    #[test]
    fn timespec_conversion_truncates_to_millis() {
        let input = Timespec {
            tv_sec: 12,
            tv_nsec: 345_678_901,
        };
        assert_eq!(timespec_to_millis(input), 12_345);
    }

    #[test]
    fn timespec_conversion_wraps() {
        // 2^32 ms is 4_294_967.296 s.
        let input = Timespec {
            tv_sec: 4_294_968,
            tv_nsec: 0,
        };
        assert_eq!(timespec_to_millis(input), 704);
    }

    #[test]
    fn negative_timespecs_read_as_zero() {
        let input = Timespec {
            tv_sec: -5,
            tv_nsec: -1,
        };
        assert_eq!(timespec_to_millis(input), 0);
    }

    #[test]
    fn clocks_agree_on_monotonic() {
        let a = now_millis();
        let b = Clock::Posix(PosixClockId::Monotonic).now_millis();
        assert!(b.wrapping_sub(a) < 1_000, "reads {a} then {b}");
    }
}

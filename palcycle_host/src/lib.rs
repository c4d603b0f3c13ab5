// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-side wiring for palcycle animations.
//!
//! A presenter (a Wayland client, a windowing toolkit, a test harness) owns
//! the buffers and the frame callbacks. This crate supplies the rest:
//!
//! - [`Animator`] — one raster, a pacer, and a surface per output; feed it
//!   every frame callback and mark the returned region damaged
//! - [`now_millis`] / [`Clock`] — millisecond timestamps in the same units
//!   frame callbacks use, for hosts that pace frames themselves
//!
//! ```text
//!   frame callback(output, time_ms)
//!        │
//!        ▼
//!   Animator::on_frame ──► CyclePacer (driver only) ──► OutputSurface::frame
//!        │
//!        ▼
//!   DamageRegion ──► damage_buffer + commit
//! ```

mod animator;
mod time;

pub use animator::Animator;
pub use time::{Clock, now_millis};

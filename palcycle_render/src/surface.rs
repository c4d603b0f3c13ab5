// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-output presentation state.
//!
//! One raster can be shown on several outputs at once. Exactly one of them,
//! the [`Role::Driver`], advances the cycle engine; every other output is a
//! [`Role::Follower`] that only repaints when the raster's frame count has
//! moved past the one it last presented. Followers paint every range, since
//! the damage marks are cleared by the driver.
//!
//! ```text
//!   frame callback ──► OutputSurface::frame()
//!                         │
//!                         ├─ full redraw pending? ──► clear + render_full ──► Full
//!                         │
//!                         ├─ driver: tick × n
//!                         │
//!                         └─ raster ahead of us? ──► render_delta ──► merge Rect
//! ```

use palcycle_core::color::Color;
use palcycle_core::layout::{self, LayoutConfig, Placement};
use palcycle_core::output::OutputId;
use palcycle_core::raster::IndexedRaster;
use palcycle_core::trace::{RenderEvent, RenderKind, Tracer};

use crate::canvas::Canvas;
use crate::damage::{DamageRect, DamageRegion};
use crate::delta::render_delta;
use crate::full::render_full;

/// Whether a surface advances the animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Runs cycle ticks and clears damage marks.
    Driver,
    /// Presents whatever the driver produced.
    Follower,
}

/// Appearance settings for one output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceConfig {
    /// How the image is scaled and positioned.
    pub layout: LayoutConfig,
    /// Fill for the area the image does not cover.
    pub background: Color,
}

impl SurfaceConfig {
    /// `Fit` layout on black.
    pub const DEFAULT: Self = Self {
        layout: LayoutConfig::with_mode(layout::FitMode::Fit),
        background: Color::BLACK,
    };
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One output presenting a shared raster.
#[derive(Clone, Debug)]
pub struct OutputSurface {
    id: OutputId,
    role: Role,
    config: SurfaceConfig,
    size: Option<(u32, u32)>,
    placement: Placement,
    frame_count: u64,
    needs_full: bool,
}

impl OutputSurface {
    /// Creates a surface that will do a full redraw on its first frame.
    #[must_use]
    pub const fn new(id: OutputId, role: Role, config: SurfaceConfig) -> Self {
        Self {
            id,
            role,
            config,
            size: None,
            placement: Placement::IDENTITY,
            frame_count: 0,
            needs_full: true,
        }
    }

    /// The output this surface presents on.
    #[must_use]
    pub const fn id(&self) -> OutputId {
        self.id
    }

    /// Current role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Changes the role, e.g. when the driver's output goes away.
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Appearance settings.
    #[must_use]
    pub const fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Buffer size from the last [`configure`](Self::configure), if any.
    #[must_use]
    pub const fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    /// Where the raster lands in the buffer.
    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }

    /// The raster frame count this surface last presented.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Whether the next frame repaints the whole buffer.
    #[must_use]
    pub const fn needs_full_redraw(&self) -> bool {
        self.needs_full
    }

    /// Forces the next frame to repaint the whole buffer, e.g. after the
    /// presenter swapped to a buffer with stale contents.
    pub fn request_full_redraw(&mut self) {
        self.needs_full = true;
    }

    /// Records the buffer size, recomputing the placement if it changed.
    ///
    /// Returns `true` if the size changed, in which case a full redraw is
    /// pending.
    pub fn configure(&mut self, width: u32, height: u32, raster: &IndexedRaster) -> bool {
        if self.size == Some((width, height)) {
            return false;
        }
        self.size = Some((width, height));
        self.placement = layout::place(
            raster.width(),
            raster.height(),
            width,
            height,
            &self.config.layout,
        );
        self.needs_full = true;
        true
    }

    /// Produces one frame into `canvas`.
    ///
    /// `ticks` is how many cycle ticks are due; followers ignore it. A canvas
    /// whose size differs from the configured one reconfigures the surface
    /// first.
    ///
    /// A pending full redraw is painted before the ticks run, and the delta
    /// painted after them is merged into the returned region, which is what
    /// the presenter must mark as damaged.
    pub fn frame(
        &mut self,
        raster: &mut IndexedRaster,
        canvas: &mut Canvas<'_>,
        ticks: u32,
        tracer: &mut Tracer<'_>,
    ) -> DamageRegion {
        self.configure(canvas.width(), canvas.height(), raster);

        let driving = self.role == Role::Driver;
        let mut region = DamageRegion::None;

        if self.needs_full {
            canvas.clear(self.config.background);
            render_full(raster, canvas, &self.placement);
            if driving {
                // The full redraw covers anything the marks point at.
                for range in 0..raster.range_states().len() {
                    raster.take_damage(range);
                }
            }
            self.needs_full = false;
            self.frame_count = raster.frame_count();
            tracer.render(&RenderEvent {
                output: self.id,
                kind: RenderKind::Full,
                ranges: raster.ranges().len(),
                pixels: raster.pixels().len(),
                damage: [
                    0,
                    0,
                    i32::try_from(canvas.width()).unwrap_or(i32::MAX),
                    i32::try_from(canvas.height()).unwrap_or(i32::MAX),
                ],
            });
            region = DamageRegion::Full;
        }

        if driving {
            for _ in 0..ticks {
                raster.tick_with(tracer);
            }
        }

        if raster.frame_count() > self.frame_count {
            let (ranges, pixels) = raster
                .range_states()
                .iter()
                .filter(|state| !driving || state.is_damaged())
                .fold((0, 0), |(r, p), state| (r + 1, p + state.offsets().len()));
            let damage: DamageRect = render_delta(raster, canvas, &self.placement, driving);
            self.frame_count = raster.frame_count();

            tracer.render(&RenderEvent {
                output: self.id,
                kind: RenderKind::Delta,
                ranges,
                pixels,
                damage: damage.to_array(),
            });
            region.merge(&DamageRegion::from_rect(damage));
        }

        region
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use palcycle_core::layout::FitMode;
    use palcycle_core::raster::{CycleRange, Palette};

    use super::*;

    fn raster() -> IndexedRaster {
        let mut palette = Palette::black();
        for i in 0..=255_u8 {
            palette.set(i, Color::opaque(i, i, 0));
        }
        let pixels = vec![0, 1, 2, 3, 4, 5];
        let ranges = vec![
            CycleRange::new(1, 2, 16384).unwrap(),
            CycleRange::new(4, 5, 8192).unwrap(),
        ];
        IndexedRaster::from_parts(3, 2, palette, pixels, ranges).unwrap()
    }

    fn config() -> SurfaceConfig {
        SurfaceConfig {
            layout: LayoutConfig {
                mode: FitMode::Fit,
                margin: 0,
            },
            background: Color::opaque(0, 0, 0x80),
        }
    }

    #[test]
    fn first_frame_is_full_and_clears_background() {
        let mut raster = raster();
        let mut surface = OutputSurface::new(OutputId(1), Role::Driver, config());
        let mut px = vec![0_u32; 8 * 4];
        let mut canvas = Canvas::new(&mut px, 8, 4).unwrap();

        let region = surface.frame(&mut raster, &mut canvas, 0, &mut Tracer::none());
        assert_eq!(region, DamageRegion::Full);
        assert_eq!(surface.size(), Some((8, 4)));
        // 3x2 on 8x4 with no margin: scale 2 at (1, 0).
        assert_eq!(surface.placement(), Placement::new(1, 0, 2).unwrap());
        assert_eq!(canvas.get(0, 0), Some(Color::opaque(0, 0, 0x80).to_argb8888()));
        assert_eq!(canvas.get(7, 3), Some(Color::opaque(0, 0, 0x80).to_argb8888()));
        assert_eq!(raster.frame_count(), 0, "no ticks were due");
    }

    #[test]
    fn full_redraw_runs_due_ticks() {
        let mut raster = raster();
        let mut surface = OutputSurface::new(OutputId(1), Role::Driver, config());
        let mut px = vec![0_u32; 8 * 4];
        let mut canvas = Canvas::new(&mut px, 8, 4).unwrap();

        let region = surface.frame(&mut raster, &mut canvas, 2, &mut Tracer::none());
        assert_eq!(region, DamageRegion::Full, "delta damage folds into Full");
        assert_eq!(raster.frame_count(), 2);
        assert_eq!(surface.frame_count(), 2);
        assert!(!raster.has_damage());

        let mut expected = vec![0_u32; 8 * 4];
        let mut reference = Canvas::new(&mut expected, 8, 4).unwrap();
        reference.clear(config().background);
        render_full(&raster, &mut reference, &surface.placement());
        assert_eq!(px, expected, "buffer shows the ticked palette");
    }

    #[test]
    fn driver_ticks_and_reports_damage() {
        let mut raster = raster();
        let mut surface = OutputSurface::new(OutputId(1), Role::Driver, config());
        let mut px = vec![0_u32; 8 * 4];
        let mut canvas = Canvas::new(&mut px, 8, 4).unwrap();
        let tracer = &mut Tracer::none();

        surface.frame(&mut raster, &mut canvas, 0, tracer);
        let region = surface.frame(&mut raster, &mut canvas, 1, tracer);
        // Only the first range rotated: source (1,0)..=(2,0).
        assert_eq!(region, DamageRegion::Rect(DamageRect::new(3, 0, 7, 2)));
        assert_eq!(surface.frame_count(), 1);
        assert!(!raster.has_damage());

        assert_eq!(
            surface.frame(&mut raster, &mut canvas, 0, tracer),
            DamageRegion::None
        );
    }

    #[test]
    fn follower_catches_up_without_ticking() {
        let mut raster = raster();
        let mut driver = OutputSurface::new(OutputId(1), Role::Driver, config());
        let mut follower = OutputSurface::new(OutputId(2), Role::Follower, config());
        let mut a = vec![0_u32; 3 * 2];
        let mut b = vec![0_u32; 6 * 4];
        let tracer = &mut Tracer::none();

        follower.frame(&mut raster, &mut Canvas::new(&mut b, 6, 4).unwrap(), 0, tracer);
        driver.frame(&mut raster, &mut Canvas::new(&mut a, 3, 2).unwrap(), 0, tracer);

        // Followers never tick, whatever they are told.
        assert_eq!(
            follower.frame(&mut raster, &mut Canvas::new(&mut b, 6, 4).unwrap(), 5, tracer),
            DamageRegion::None
        );
        assert_eq!(raster.frame_count(), 0);

        driver.frame(&mut raster, &mut Canvas::new(&mut a, 3, 2).unwrap(), 2, tracer);
        assert_eq!(raster.frame_count(), 2);

        let region = follower.frame(&mut raster, &mut Canvas::new(&mut b, 6, 4).unwrap(), 0, tracer);
        // Followers repaint every range.
        assert_eq!(region, DamageRegion::Rect(DamageRect::new(2, 0, 6, 4)));
        assert_eq!(follower.frame_count(), 2);

        let expected: Vec<u32> = [0_u32, 1, 2, 3, 4, 5]
            .iter()
            .map(|&i| {
                let index = u8::try_from(i).unwrap();
                raster.palette()[index].to_argb8888()
            })
            .collect();
        assert_eq!(a, expected, "driver buffer matches the raster");
        assert_eq!(b[0], expected[0]);
        assert_eq!(b[2], expected[1]);
    }

    #[test]
    fn resize_requests_full_redraw() {
        let raster = raster();
        let mut surface = OutputSurface::new(OutputId(3), Role::Follower, config());
        assert!(surface.needs_full_redraw());
        assert!(surface.configure(100, 100, &raster));
        assert!(!surface.configure(100, 100, &raster));

        let mut raster = raster;
        let mut px = vec![0_u32; 100 * 100];
        surface.frame(
            &mut raster,
            &mut Canvas::new(&mut px, 100, 100).unwrap(),
            0,
            &mut Tracer::none(),
        );
        assert!(!surface.needs_full_redraw());

        assert!(surface.configure(50, 100, &raster));
        assert!(surface.needs_full_redraw());
        surface.request_full_redraw();
        assert!(surface.needs_full_redraw());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn frames_are_traced() {
        use palcycle_core::trace::TraceSink;

        #[derive(Default)]
        struct Recorder(Vec<RenderEvent>);
        impl TraceSink for Recorder {
            fn on_render(&mut self, e: &RenderEvent) {
                self.0.push(*e);
            }
        }

        let mut raster = raster();
        let mut surface = OutputSurface::new(OutputId(9), Role::Driver, config());
        let mut px = vec![0_u32; 3 * 2];
        let mut rec = Recorder::default();
        {
            let mut tracer = Tracer::new(&mut rec);
            let mut canvas = Canvas::new(&mut px, 3, 2).unwrap();
            surface.frame(&mut raster, &mut canvas, 0, &mut tracer);
            surface.frame(&mut raster, &mut canvas, 2, &mut tracer);
        }

        assert_eq!(rec.0.len(), 2);
        assert_eq!(rec.0[0].kind, RenderKind::Full);
        assert_eq!(rec.0[0].damage, [0, 0, 3, 2]);
        assert_eq!(rec.0[1].kind, RenderKind::Delta);
        assert_eq!(rec.0[1].ranges, 2);
        assert_eq!(rec.0[1].pixels, 4);
        assert_eq!(rec.0[1].output, OutputId(9));
    }
}

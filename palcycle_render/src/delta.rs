// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage-limited blitting.
//!
//! After a tick only the pixels whose palette index lies in a rotated range
//! can change color. The delta path repaints exactly those, found through
//! each range's precomputed [`PixelIndexList`](palcycle_core::raster::PixelIndexList),
//! and reports the destination rectangle covering them. Its cost is linear
//! in the number of cycling pixels rather than in the image size.

use palcycle_core::layout::Placement;
use palcycle_core::raster::{IndexedRaster, PixelBounds};

use crate::canvas::Canvas;
use crate::damage::DamageRect;
use crate::full::packed_palette;

/// Repaints the pixels of cycling ranges and returns the damaged area.
///
/// With `clear_damage`, only ranges marked damaged by the last ticks are
/// painted, and their marks are cleared. This is what the single consumer
/// driving the animation does. Without it every range is painted and the
/// marks are left alone, for consumers that present the same raster without
/// driving it (see [`render_ranges`]).
///
/// The returned rectangle is the union of the painted ranges' bounding boxes
/// mapped to destination pixels and clipped to the canvas. It is
/// [`DamageRect::EMPTY`] if nothing visible was painted.
pub fn render_delta(
    raster: &mut IndexedRaster,
    canvas: &mut Canvas<'_>,
    placement: &Placement,
    clear_damage: bool,
) -> DamageRect {
    if !clear_damage {
        return render_ranges(raster, canvas, placement);
    }

    let lut = packed_palette(raster);
    let mut bounds: Option<PixelBounds> = None;
    for range in 0..raster.range_states().len() {
        if !raster.take_damage(range) {
            continue;
        }
        let painted = paint_range(raster, range, &lut, canvas, placement);
        bounds = union_bounds(bounds, painted);
    }
    to_damage(bounds, canvas, placement)
}

/// Repaints every cycling range without touching damage marks.
///
/// See [`render_delta`].
pub fn render_ranges(
    raster: &IndexedRaster,
    canvas: &mut Canvas<'_>,
    placement: &Placement,
) -> DamageRect {
    let lut = packed_palette(raster);
    let mut bounds: Option<PixelBounds> = None;
    for range in 0..raster.range_states().len() {
        let painted = paint_range(raster, range, &lut, canvas, placement);
        bounds = union_bounds(bounds, painted);
    }
    to_damage(bounds, canvas, placement)
}

fn paint_range(
    raster: &IndexedRaster,
    range: usize,
    lut: &[u32; 256],
    canvas: &mut Canvas<'_>,
    placement: &Placement,
) -> Option<PixelBounds> {
    let state = &raster.range_states()[range];
    let width = raster.width();
    let pixels = raster.pixels();
    let scale = i64::from(placement.scale());
    let ox = i64::from(placement.origin_x());
    let oy = i64::from(placement.origin_y());

    for &offset in state.offsets() {
        let argb = lut[usize::from(pixels[offset as usize])];
        let sx = i64::from(offset % width);
        let sy = i64::from(offset / width);
        canvas.fill_block(sx * scale + ox, sy * scale + oy, scale, argb);
    }
    state.bounds()
}

fn union_bounds(acc: Option<PixelBounds>, next: Option<PixelBounds>) -> Option<PixelBounds> {
    match (acc, next) {
        (Some(a), Some(b)) => Some(a.union(b)),
        (a, b) => a.or(b),
    }
}

/// Maps inclusive source bounds to a clipped, half-open destination rect.
fn to_damage(bounds: Option<PixelBounds>, canvas: &Canvas<'_>, placement: &Placement) -> DamageRect {
    let Some(b) = bounds else {
        return DamageRect::EMPTY;
    };
    let scale = i64::from(placement.scale());
    let ox = i64::from(placement.origin_x());
    let oy = i64::from(placement.origin_y());
    let clamp = |v: i64| i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX });

    DamageRect::new(
        clamp(i64::from(b.min_x) * scale + ox),
        clamp(i64::from(b.min_y) * scale + oy),
        clamp(i64::from(b.max_x) * scale + ox + scale),
        clamp(i64::from(b.max_y) * scale + oy + scale),
    )
    .clip(canvas.width(), canvas.height())
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use palcycle_core::color::Color;
    use palcycle_core::raster::{CycleRange, Palette};

    use super::*;
    use crate::full::render_full;

    const SENTINEL: u32 = 0x1234_5678;

    /// Deterministic xorshift32.
    struct Rng(u32);

    impl Rng {
        fn next_u32(&mut self) -> u32 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            self.0 = x;
            x
        }

        fn below(&mut self, n: u32) -> u32 {
            self.next_u32() % n
        }

        fn between(&mut self, lo: i32, hi: i32) -> i32 {
            let span = u32::try_from(hi - lo + 1).unwrap();
            lo + i32::try_from(self.below(span)).unwrap()
        }
    }

    fn distinct_palette() -> Palette {
        let mut palette = Palette::black();
        for i in 0..=255_u8 {
            palette.set(i, Color::opaque(i, 255 - i, i ^ 0x5a));
        }
        palette
    }

    /// A 12x9 raster with overlapping ranges of assorted speeds.
    fn cycling_raster(rng: &mut Rng) -> IndexedRaster {
        let pixels: Vec<u8> = (0..12 * 9)
            .map(|_| u8::try_from(rng.below(48)).unwrap())
            .collect();
        let ranges = vec![
            CycleRange::new(0, 7, 16384).unwrap(),
            CycleRange::new(5, 12, 8192).unwrap(),
            CycleRange::new(20, 31, 3000).unwrap(),
            CycleRange::new(32, 32, 16384).unwrap(),
            CycleRange::new(40, 47, 40000).unwrap(),
            CycleRange::new(200, 210, 16384).unwrap(),
        ];
        IndexedRaster::from_parts(12, 9, distinct_palette(), pixels, ranges).unwrap()
    }

    fn single_range_raster() -> IndexedRaster {
        #[rustfmt::skip]
        let pixels = vec![
            0, 0, 0, 0,
            0, 10, 11, 0,
            0, 0, 12, 0,
        ];
        let ranges = vec![CycleRange::new(10, 12, 16384).unwrap()];
        IndexedRaster::from_parts(4, 3, distinct_palette(), pixels, ranges).unwrap()
    }

    #[test]
    fn delta_reports_scaled_damage_and_clears_it() {
        let mut raster = single_range_raster();
        let mut px = vec![0_u32; 20 * 20];
        let mut canvas = Canvas::new(&mut px, 20, 20).unwrap();
        let placement = Placement::new(2, 3, 2).unwrap();

        assert!(raster.tick());
        let damage = render_delta(&mut raster, &mut canvas, &placement, true);
        // Source bounds (1,1)..=(2,2) at scale 2 from (2,3).
        assert_eq!(damage, DamageRect::new(4, 5, 8, 9));
        assert!(!raster.has_damage());

        let again = render_delta(&mut raster, &mut canvas, &placement, true);
        assert!(again.is_empty(), "no tick, no damage");
        assert_eq!(again, DamageRect::EMPTY);
    }

    #[test]
    fn followers_paint_everything_and_leave_marks() {
        let mut raster = single_range_raster();
        let mut px = vec![0_u32; 4 * 3];
        let mut canvas = Canvas::new(&mut px, 4, 3).unwrap();

        raster.tick();
        let damage = render_delta(&mut raster, &mut canvas, &Placement::IDENTITY, false);
        assert_eq!(damage, DamageRect::new(1, 1, 3, 3));
        assert!(raster.has_damage(), "marks belong to the driver");

        // Painted even without a tick.
        let damage = render_ranges(&raster, &mut canvas, &Placement::IDENTITY);
        assert_eq!(damage, DamageRect::new(1, 1, 3, 3));
    }

    #[test]
    fn damage_is_clipped_to_the_canvas() {
        let mut raster = single_range_raster();
        let mut px = vec![0_u32; 6 * 6];
        let mut canvas = Canvas::new(&mut px, 6, 6).unwrap();

        raster.tick();
        let damage = render_delta(&mut raster, &mut canvas, &Placement::new(-4, 1, 3).unwrap(), true);
        // Unclipped: x -1..5, y 4..10.
        assert_eq!(damage, DamageRect::new(0, 4, 5, 6));

        raster.tick();
        let off = render_delta(&mut raster, &mut canvas, &Placement::new(50, 50, 1).unwrap(), true);
        assert_eq!(off, DamageRect::EMPTY);
    }

    #[test]
    fn unused_ranges_add_no_damage() {
        let mut raster = IndexedRaster::from_parts(
            2,
            2,
            distinct_palette(),
            vec![0; 4],
            vec![CycleRange::new(100, 101, 16384).unwrap()],
        )
        .unwrap();
        let mut px = vec![0_u32; 4];
        let mut canvas = Canvas::new(&mut px, 2, 2).unwrap();
        assert!(raster.tick());
        assert!(render_delta(&mut raster, &mut canvas, &Placement::IDENTITY, true).is_empty());
    }

    #[test]
    fn delta_after_each_tick_matches_full_redraw() {
        let mut rng = Rng(0x9e37_79b9);
        let mut raster = cycling_raster(&mut rng);
        let placement = Placement::new(3, -2, 2).unwrap();
        let (w, h) = (25, 17);

        let mut full_px = vec![SENTINEL; w * h];
        let mut delta_px = vec![SENTINEL; w * h];
        {
            let mut delta = Canvas::new(&mut delta_px, 25, 17).unwrap();
            render_full(&raster, &mut delta, &placement);
        }

        for tick in 0..200 {
            raster.tick();
            let mut full = Canvas::new(&mut full_px, 25, 17).unwrap();
            render_full(&raster, &mut full, &placement);
            let mut delta = Canvas::new(&mut delta_px, 25, 17).unwrap();
            render_delta(&mut raster, &mut delta, &placement, true);
            assert_eq!(full_px, delta_px, "buffers diverge after tick {tick}");
        }
    }

    #[test]
    fn follower_matches_driver() {
        let mut rng = Rng(7);
        let mut raster = cycling_raster(&mut rng);
        let placement = Placement::IDENTITY;

        let mut driver_px = vec![0_u32; 12 * 9];
        let mut follower_px = vec![0_u32; 12 * 9];
        render_full(&raster, &mut Canvas::new(&mut driver_px, 12, 9).unwrap(), &placement);
        render_full(&raster, &mut Canvas::new(&mut follower_px, 12, 9).unwrap(), &placement);

        for _ in 0..50 {
            raster.tick();
            let mut driver = Canvas::new(&mut driver_px, 12, 9).unwrap();
            render_delta(&mut raster, &mut driver, &placement, true);
            let mut follower = Canvas::new(&mut follower_px, 12, 9).unwrap();
            render_delta(&mut raster, &mut follower, &placement, false);
            assert_eq!(driver_px, follower_px);
        }
    }

    #[test]
    fn random_placements_stay_inside_the_canvas() {
        const W: u32 = 16;
        const H: u32 = 11;
        const STRIDE: usize = 19;
        let mut rng = Rng(0xc0ff_ee11);
        let mut raster = cycling_raster(&mut rng);
        let len = STRIDE * (H as usize) + 7;

        for round in 0..500 {
            let placement = Placement::new(
                rng.between(-30, 20),
                rng.between(-30, 15),
                rng.between(1, 4),
            )
            .unwrap();
            let mut px = vec![SENTINEL; len];
            let mut canvas = Canvas::with_stride(&mut px, W, H, STRIDE).unwrap();

            raster.tick();
            if round % 2 == 0 {
                render_full(&raster, &mut canvas, &placement);
            }
            let damage = render_delta(&mut raster, &mut canvas, &placement, round % 3 != 0);

            if !damage.is_empty() {
                assert!(damage.min_x >= 0 && damage.min_y >= 0, "{placement:?}");
                assert!(
                    damage.max_x <= 16 && damage.max_y <= 11,
                    "{placement:?} gave {damage:?}"
                );
            }
            for (i, &p) in px.iter().enumerate() {
                let (row, col) = (i / STRIDE, i % STRIDE);
                let visible = row < H as usize && col < W as usize;
                if !visible {
                    assert_eq!(p, SENTINEL, "{placement:?} wrote outside at {i}");
                }
            }
        }
    }
}

// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Full-frame blitting.

use kurbo::Rect;
use palcycle_core::layout::Placement;
use palcycle_core::raster::IndexedRaster;

use crate::canvas::{Canvas, to_index};

/// Packs the current palette once per frame.
pub(crate) fn packed_palette(raster: &IndexedRaster) -> [u32; 256] {
    let colors = raster.palette().colors();
    core::array::from_fn(|i| colors[i].to_argb8888())
}

/// Edges of a rectangle whose coordinates are whole pixels.
#[expect(
    clippy::cast_possible_truncation,
    reason = "edges are whole numbers clipped to the canvas"
)]
fn pixel_edges(rect: Rect) -> (i64, i64, i64, i64) {
    (rect.x0 as i64, rect.y0 as i64, rect.x1 as i64, rect.y1 as i64)
}

/// Paints the whole raster into `canvas` at `placement`.
///
/// Destination pixel `(x, y)` takes the color of source pixel
/// `((x - origin_x) / scale, (y - origin_y) / scale)`. Destination pixels
/// outside the scaled image are left untouched, as is everything outside the
/// canvas's visible area.
///
/// Returns the number of destination pixels written.
pub fn render_full(raster: &IndexedRaster, canvas: &mut Canvas<'_>, placement: &Placement) -> u64 {
    let scale = i64::from(placement.scale());
    let ox = i64::from(placement.origin_x());
    let oy = i64::from(placement.origin_y());

    let visible = Rect::new(0.0, 0.0, f64::from(canvas.width()), f64::from(canvas.height()));
    let covered = placement
        .dest_rect(raster.width(), raster.height())
        .intersect(visible);
    if covered.is_zero_area() {
        return 0;
    }
    let (x0, y0, x1, y1) = pixel_edges(covered);

    let lut = packed_palette(raster);
    let src_width = raster.width() as usize;
    let pixels = raster.pixels();

    for y in y0..y1 {
        let sy = to_index((y - oy) / scale);
        let src_row = &pixels[sy * src_width..(sy + 1) * src_width];
        let Ok(y) = u32::try_from(y) else {
            break;
        };
        let dst_row = canvas.row_mut(y);
        for (x, dst) in (x0..x1).zip(&mut dst_row[to_index(x0)..to_index(x1)]) {
            let sx = to_index((x - ox) / scale);
            *dst = lut[usize::from(src_row[sx])];
        }
    }

    (x1 - x0).unsigned_abs() * (y1 - y0).unsigned_abs()
}

// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoding of chunked indexed-color images into an [`IndexedRaster`].
//!
//! The root chunk must be a `FORM`. Its direct children are walked in file
//! order: the last `BMHD`, `CMAP` and `BODY` win, and every `CRNG` with a
//! positive rate and `low <= high` becomes a cycle range. Nested containers
//! and unknown tags are skipped. The chunk tree borrows the input and is
//! dropped before [`decode`] returns; only the raster survives.

use alloc::vec;
use alloc::vec::Vec;

use crate::byterun::{self, Compression};
use crate::color::Color;
use crate::error::FormatError;
use crate::iff::{self, BitmapHeader, ChunkData, ColorMap, Container, Tag};
use crate::raster::{self, CycleRange, IndexedRaster, Palette};
use crate::trace::{ChunkSkipEvent, DecodeEvent, DropReason, RangeDropEvent, Tracer};

/// Decodes an in-memory image.
///
/// # Errors
///
/// Returns a [`FormatError`] if the bytes are not a well-formed 8-bit
/// indexed image with a header, a palette and a body.
pub fn decode(bytes: &[u8]) -> Result<IndexedRaster, FormatError> {
    decode_with(bytes, &mut Tracer::none())
}

/// Like [`decode`], reporting skipped chunks, dropped ranges and the final
/// result to `tracer`.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_with(bytes: &[u8], tracer: &mut Tracer<'_>) -> Result<IndexedRaster, FormatError> {
    let root = iff::parse_chunk(bytes)?;
    let ChunkData::Container(form) = &root.data else {
        return Err(FormatError::NotAContainer(root.tag));
    };

    let parts = collect(form, tracer);

    let header = parts.header.ok_or(FormatError::MissingChunk(Tag::BMHD))?;
    let color_map = parts.palette.ok_or(FormatError::MissingChunk(Tag::CMAP))?;
    let body = parts.body.ok_or(FormatError::MissingChunk(Tag::BODY))?;

    if header.planes != 8 {
        return Err(FormatError::UnsupportedDepth(header.planes));
    }
    let compression = Compression::from_raw(header.compression)?;
    let width = u32::from(header.width);
    let height = u32::from(header.height);

    let mut pixels = vec![0_u8; raster::pixel_count(width, height)?];
    byterun::unpack(&mut pixels, body, compression)?;

    let range_count = parts.ranges.len();
    let raster =
        IndexedRaster::from_parts(width, height, palette_from(color_map), pixels, parts.ranges)?;

    tracer.decode(&DecodeEvent {
        width,
        height,
        compression,
        ranges: range_count,
        dropped_ranges: parts.dropped_ranges,
        skipped_chunks: parts.skipped_chunks,
    });

    Ok(raster)
}

/// Reads and decodes an image file.
///
/// # Errors
///
/// Returns [`LoadError::Io`](crate::error::LoadError::Io) if the file cannot
/// be read and [`LoadError::Format`](crate::error::LoadError::Format) if it
/// does not decode.
#[cfg(feature = "std")]
pub fn decode_file(
    path: impl AsRef<std::path::Path>,
) -> Result<IndexedRaster, crate::error::LoadError> {
    let bytes = std::fs::read(path)?;
    Ok(decode(&bytes)?)
}

/// What the walk over the root container found.
struct Parts<'a> {
    header: Option<BitmapHeader>,
    palette: Option<&'a ColorMap>,
    body: Option<&'a [u8]>,
    ranges: Vec<CycleRange>,
    dropped_ranges: usize,
    skipped_chunks: usize,
}

fn collect<'a>(form: &'a Container<'_>, tracer: &mut Tracer<'_>) -> Parts<'a> {
    let cycling = form
        .children
        .iter()
        .filter(|c| matches!(&c.data, ChunkData::CycleRange(r) if r.rate > 0))
        .count();

    let mut parts = Parts {
        header: None,
        palette: None,
        body: None,
        ranges: Vec::with_capacity(cycling),
        dropped_ranges: 0,
        skipped_chunks: 0,
    };
    let mut crng_index = 0;

    for child in &form.children {
        match &child.data {
            ChunkData::Header(header) => parts.header = Some(*header),
            ChunkData::Palette(map) => parts.palette = Some(map),
            ChunkData::Body(bytes) => parts.body = Some(*bytes),
            ChunkData::CycleRange(raw) => {
                match cycle_range(raw) {
                    Ok(range) => parts.ranges.push(range),
                    Err(reason) => {
                        parts.dropped_ranges += 1;
                        tracer.range_drop(&RangeDropEvent {
                            index: crng_index,
                            low: raw.low,
                            high: raw.high,
                            rate: raw.rate,
                            reason,
                        });
                    }
                }
                crng_index += 1;
            }
            ChunkData::Container(_) | ChunkData::Unknown => {
                parts.skipped_chunks += 1;
                tracer.chunk_skip(&ChunkSkipEvent {
                    tag: child.tag,
                    len: child.len,
                });
            }
        }
    }

    parts
}

fn cycle_range(raw: &iff::CycleRange) -> Result<CycleRange, DropReason> {
    let rate = u16::try_from(raw.rate)
        .ok()
        .filter(|&r| r > 0)
        .ok_or(DropReason::NotCycling)?;
    CycleRange::new(raw.low, raw.high, rate).ok_or(DropReason::Inverted)
}

fn palette_from(map: &ColorMap) -> Palette {
    Palette::new(map.entries.map(|[r, g, b]| Color::opaque(r, g, b)))
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::testing::{body, chunk, crng, form, header, header_with_planes, ramp_palette};

    fn image(children: &[Vec<u8>]) -> Vec<u8> {
        form(b"PBM ", children)
    }

    #[test]
    fn decodes_raw_body_with_one_range() {
        let bytes = image(&[
            header(4, 2, 0),
            ramp_palette(),
            crng(100, 10, 12),
            body(&[0, 10, 11, 12, 13, 10, 0, 255]),
        ]);
        let raster = decode(&bytes).unwrap();

        assert_eq!(raster.width(), 4);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.pixels(), &[0, 10, 11, 12, 13, 10, 0, 255]);
        assert_eq!(raster.ranges(), &[CycleRange::new(10, 12, 100).unwrap()]);
        assert_eq!(raster.palette()[10], Color::opaque(10, 245, 5));
        assert_eq!(raster.frame_count(), 0);

        let list = &raster.range_states()[0];
        assert_eq!(list.offsets(), &[1, 2, 3, 5]);
        for (offset, &index) in raster.pixels().iter().enumerate() {
            let listed = list.offsets().contains(&u32::try_from(offset).unwrap());
            assert_eq!(listed, (10..=12).contains(&index), "offset {offset}");
        }
        let bounds = list.bounds().unwrap();
        assert_eq!((bounds.min_x, bounds.min_y), (1, 0));
        assert_eq!((bounds.max_x, bounds.max_y), (3, 1));
    }

    #[test]
    fn palette_entries_are_opaque() {
        let bytes = image(&[header(1, 1, 0), ramp_palette(), body(&[0])]);
        let raster = decode(&bytes).unwrap();
        for (i, color) in (0..=255_u8).zip(raster.palette().colors()) {
            assert_eq!(*color, Color::opaque(i, 255 - i, i / 2), "entry {i}");
        }
    }

    #[test]
    fn decodes_byte_run_body() {
        let bytes = image(&[
            header(5, 1, 1),
            ramp_palette(),
            body(&[1, 0xAA, 0xBB, 0xFE, 0xCC]),
        ]);
        let raster = decode(&bytes).unwrap();
        assert_eq!(raster.pixels(), &[0xAA, 0xBB, 0xCC, 0xCC, 0xCC]);
        assert!(!raster.is_animated());
    }

    #[test]
    fn missing_chunks_fail_fast() {
        let no_header = image(&[ramp_palette(), body(&[0; 4])]);
        assert_eq!(
            decode(&no_header).unwrap_err(),
            FormatError::MissingChunk(Tag::BMHD)
        );

        let no_palette = image(&[header(2, 2, 0), body(&[0; 4])]);
        assert_eq!(
            decode(&no_palette).unwrap_err(),
            FormatError::MissingChunk(Tag::CMAP)
        );

        let no_body = image(&[header(2, 2, 0), ramp_palette()]);
        assert_eq!(
            decode(&no_body).unwrap_err(),
            FormatError::MissingChunk(Tag::BODY)
        );
    }

    #[test]
    fn rejects_other_depths_and_empty_images() {
        let planar = image(&[header_with_planes(2, 2, 0, 5), ramp_palette(), body(&[0; 4])]);
        assert_eq!(
            decode(&planar).unwrap_err(),
            FormatError::UnsupportedDepth(5)
        );

        let empty = image(&[header(0, 2, 0), ramp_palette(), body(&[])]);
        assert_eq!(decode(&empty).unwrap_err(), FormatError::EmptyImage);

        let packed = image(&[header(2, 2, 7), ramp_palette(), body(&[0; 4])]);
        assert_eq!(
            decode(&packed).unwrap_err(),
            FormatError::UnknownCompression(7)
        );
    }

    #[test]
    fn root_must_be_a_container() {
        let bytes = body(&[1, 2, 3, 4]);
        assert_eq!(
            decode(&bytes).unwrap_err(),
            FormatError::NotAContainer(Tag::BODY)
        );
    }

    #[test]
    fn short_body_is_truncation() {
        let bytes = image(&[header(4, 2, 0), ramp_palette(), body(&[0; 5])]);
        assert_eq!(
            decode(&bytes).unwrap_err(),
            FormatError::Truncated {
                needed: 8,
                available: 5
            }
        );
    }

    #[test]
    fn still_and_inverted_ranges_are_dropped() {
        let bytes = image(&[
            header(2, 1, 0),
            ramp_palette(),
            crng(0, 1, 2),
            crng(-5, 1, 2),
            crng(300, 4, 3),
            crng(16384, 0, 1),
            body(&[0, 1]),
        ]);
        let raster = decode(&bytes).unwrap();
        assert_eq!(raster.ranges(), &[CycleRange::new(0, 1, 16384).unwrap()]);
        assert_eq!(raster.range_states().len(), 1);
    }

    #[test]
    fn later_chunks_override_earlier_ones() {
        let bytes = image(&[
            header(8, 8, 0),
            body(&[9; 64]),
            header(2, 1, 0),
            ramp_palette(),
            crng(100, 1, 2),
            body(&[3, 4]),
            crng(200, 5, 6),
        ]);
        let raster = decode(&bytes).unwrap();
        assert_eq!((raster.width(), raster.height()), (2, 1));
        assert_eq!(raster.pixels(), &[3, 4]);
        let rates: Vec<u16> = raster.ranges().iter().map(|r| r.rate()).collect();
        assert_eq!(rates, [100, 200], "ranges accumulate in file order");
    }

    #[test]
    fn unknown_and_nested_chunks_are_skipped() {
        let bytes = image(&[
            chunk(b"ANNO", b"made by hand"),
            header(1, 1, 0),
            form(b"ILBM", &[header(9, 9, 0)]),
            ramp_palette(),
            chunk(b"DPPS", &[0; 3]),
            body(&[42]),
        ]);
        let raster = decode(&bytes).unwrap();
        assert_eq!((raster.width(), raster.height()), (1, 1));
        assert_eq!(raster.pixels(), &[42]);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_sees_skips_drops_and_summary() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Recorder {
            skipped: Vec<Tag>,
            dropped: Vec<(usize, DropReason)>,
            decoded: Option<DecodeEvent>,
        }
        impl TraceSink for Recorder {
            fn on_chunk_skip(&mut self, e: &ChunkSkipEvent) {
                self.skipped.push(e.tag);
            }
            fn on_range_drop(&mut self, e: &RangeDropEvent) {
                self.dropped.push((e.index, e.reason));
            }
            fn on_decode(&mut self, e: &DecodeEvent) {
                self.decoded = Some(*e);
            }
        }

        let bytes = image(&[
            header(2, 1, 1),
            chunk(b"ANNO", b"x"),
            ramp_palette(),
            crng(100, 0, 1),
            crng(0, 0, 1),
            crng(100, 9, 3),
            body(&[0xFF, 7]),
        ]);
        let mut rec = Recorder::default();
        decode_with(&bytes, &mut Tracer::new(&mut rec)).unwrap();

        assert_eq!(rec.skipped, [Tag(*b"ANNO")]);
        assert_eq!(
            rec.dropped,
            [(1, DropReason::NotCycling), (2, DropReason::Inverted)]
        );
        assert_eq!(
            rec.decoded,
            Some(DecodeEvent {
                width: 2,
                height: 1,
                compression: Compression::ByteRun1,
                ranges: 1,
                dropped_ranges: 2,
                skipped_chunks: 1,
            })
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn decode_file_reports_io_errors() {
        use crate::error::LoadError;

        let missing = std::env::temp_dir().join("palcycle-does-not-exist.lbm");
        assert!(matches!(decode_file(&missing), Err(LoadError::Io(_))));
    }

    #[cfg(feature = "std")]
    #[test]
    fn decode_file_reads_from_disk() {
        let bytes = image(&[header(1, 1, 0), ramp_palette(), body(&[5])]);
        let path = std::env::temp_dir().join(std::format!(
            "palcycle-decode-file-{}.lbm",
            std::process::id()
        ));
        std::fs::write(&path, &bytes).unwrap();
        let raster = decode_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(raster.pixels(), &[5]);
    }
}

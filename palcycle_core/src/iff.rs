// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! IFF chunk parsing.
//!
//! An IFF file is a tree of self-describing chunks. Every chunk starts with
//! a 4-byte ASCII [`Tag`] and a big-endian `u32` payload length, followed by
//! the payload and, when the length is odd, one pad byte so the next chunk
//! starts on an even offset.
//!
//! A `FORM` chunk is a container: its payload is a 4-byte form type followed
//! by child chunks packed back to back.
//!
//! ```text
//! FORM <len> PBM_
//!   ├─ BMHD <20>  width, height, planes, compression, ...
//!   ├─ CMAP <768> 256 × (r, g, b)
//!   ├─ CRNG <8>   pad, rate, flags, low, high     (zero or more)
//!   ├─ DPPS <n>   unknown, kept as length only
//!   └─ BODY <n>   pixel data (possibly ByteRun1-packed)
//! ```
//!
//! [`parse_chunk`] produces an owned [`Chunk`] tree whose `BODY` payloads
//! borrow from the input buffer. The tree has no back-references; it is
//! built once, read once by [`ilbm::decode`](crate::ilbm::decode), and
//! dropped.
//!
//! All reads go through [`ByteReader`], which bounds-checks every access and
//! reports [`FormatError::Truncated`] instead of reading past the end.

use alloc::vec::Vec;
use core::fmt;

use crate::error::FormatError;

/// Size of a chunk header: tag plus length.
pub const CHUNK_HEADER_LEN: usize = 8;

/// Size of a `BMHD` payload.
pub const BITMAP_HEADER_LEN: usize = 20;

/// Size of a `CRNG` payload.
pub const CYCLE_RANGE_LEN: usize = 8;

/// Number of entries in a `CMAP` palette.
pub const PALETTE_ENTRIES: usize = 256;

/// Size of a `CMAP` payload.
pub const PALETTE_LEN: usize = PALETTE_ENTRIES * 3;

/// A four-character chunk identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    /// Container chunk.
    pub const FORM: Self = Self(*b"FORM");
    /// Bitmap header.
    pub const BMHD: Self = Self(*b"BMHD");
    /// Color map (palette).
    pub const CMAP: Self = Self(*b"CMAP");
    /// Color-cycle range.
    pub const CRNG: Self = Self(*b"CRNG");
    /// Pixel body.
    pub const BODY: Self = Self(*b"BODY");
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", char::from(byte))?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag(\"{self}\")")
    }
}

/// Bounds-checked big-endian cursor over an immutable byte slice.
#[derive(Clone, Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a reader positioned at the start of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Offset of the cursor from the start of the input.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// The unconsumed tail of the input.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Consumes `n` bytes and returns them.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        if n > self.remaining() {
            return Err(FormatError::Truncated {
                needed: n,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Consumes `n` bytes without looking at them.
    pub fn skip(&mut self, n: usize) -> Result<(), FormatError> {
        self.take(n).map(|_| ())
    }

    /// Reads one unsigned byte.
    pub fn read_u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.take(1)?[0])
    }

    /// Reads a big-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16, FormatError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    /// Reads a big-endian `i16`.
    pub fn read_i16(&mut self) -> Result<i16, FormatError> {
        Ok(i16::from_be_bytes(self.array()?))
    }

    /// Reads a big-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32, FormatError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    /// Reads a chunk tag.
    pub fn read_tag(&mut self) -> Result<Tag, FormatError> {
        Ok(Tag(self.array()?))
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let mut out = [0_u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}

/// One parsed chunk.
#[derive(Clone, Debug)]
pub struct Chunk<'a> {
    /// The chunk's type tag.
    pub tag: Tag,
    /// Payload length rounded up to an even number of bytes.
    pub len: u32,
    /// Typed payload.
    pub data: ChunkData<'a>,
}

impl Chunk<'_> {
    /// Bytes this chunk occupies in its parent, header and pad included.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        CHUNK_HEADER_LEN.saturating_add(usize::try_from(self.len).unwrap_or(usize::MAX))
    }
}

/// Typed payload of a [`Chunk`].
#[derive(Clone, Debug)]
pub enum ChunkData<'a> {
    /// `FORM`: a nested container.
    Container(Container<'a>),
    /// `BMHD`: bitmap header.
    Header(BitmapHeader),
    /// `CMAP`: 256-entry palette.
    Palette(ColorMap),
    /// `CRNG`: one color-cycle range.
    CycleRange(CycleRange),
    /// `BODY`: raw (possibly compressed) pixel bytes.
    Body(&'a [u8]),
    /// Any other tag; only the length is kept.
    Unknown,
}

/// A `FORM` container: form type plus child chunks in file order.
#[derive(Clone, Debug)]
pub struct Container<'a> {
    /// Form type (e.g. `ILBM`, `PBM `).
    pub form_type: Tag,
    /// Child chunks in file order.
    pub children: Vec<Chunk<'a>>,
}

/// `BMHD` payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitmapHeader {
    /// Raster width in pixels.
    pub width: u16,
    /// Raster height in pixels.
    pub height: u16,
    /// Horizontal position of the image.
    pub x: i16,
    /// Vertical position of the image.
    pub y: i16,
    /// Number of bit-planes.
    pub planes: u8,
    /// Masking technique.
    pub masking: u8,
    /// Compression mode of the `BODY` chunk.
    pub compression: u8,
    /// Unused.
    pub pad: u8,
    /// Transparent palette index.
    pub transparent_color: u16,
    /// Pixel aspect numerator.
    pub x_aspect: u8,
    /// Pixel aspect denominator.
    pub y_aspect: u8,
    /// Source page width.
    pub page_width: i16,
    /// Source page height.
    pub page_height: i16,
}

impl BitmapHeader {
    fn parse(payload: &[u8]) -> Result<Self, FormatError> {
        let mut r = ByteReader::new(payload);
        if r.remaining() < BITMAP_HEADER_LEN {
            return Err(FormatError::Truncated {
                needed: BITMAP_HEADER_LEN,
                available: r.remaining(),
            });
        }
        Ok(Self {
            width: r.read_u16()?,
            height: r.read_u16()?,
            x: r.read_i16()?,
            y: r.read_i16()?,
            planes: r.read_u8()?,
            masking: r.read_u8()?,
            compression: r.read_u8()?,
            pad: r.read_u8()?,
            transparent_color: r.read_u16()?,
            x_aspect: r.read_u8()?,
            y_aspect: r.read_u8()?,
            page_width: r.read_i16()?,
            page_height: r.read_i16()?,
        })
    }
}

/// `CMAP` payload: exactly 256 RGB triples.
#[derive(Clone, PartialEq, Eq)]
pub struct ColorMap {
    /// Palette entries as `[r, g, b]`.
    pub entries: [[u8; 3]; PALETTE_ENTRIES],
}

impl ColorMap {
    fn parse(payload: &[u8], declared: u32) -> Result<Self, FormatError> {
        if payload.len() != PALETTE_LEN {
            return Err(FormatError::PaletteSize(declared));
        }
        let mut entries = [[0_u8; 3]; PALETTE_ENTRIES];
        for (entry, rgb) in entries.iter_mut().zip(payload.chunks_exact(3)) {
            entry.copy_from_slice(rgb);
        }
        Ok(Self { entries })
    }
}

impl fmt::Debug for ColorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorMap")
            .field("first", &self.entries[0])
            .field("last", &self.entries[PALETTE_ENTRIES - 1])
            .finish_non_exhaustive()
    }
}

/// `CRNG` payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleRange {
    /// Unused.
    pub pad: i16,
    /// Phase increment per tick; non-positive rates never cycle.
    pub rate: i16,
    /// Range flags.
    pub flags: i16,
    /// First palette index of the range.
    pub low: u8,
    /// Last palette index of the range (inclusive).
    pub high: u8,
}

impl CycleRange {
    fn parse(payload: &[u8]) -> Result<Self, FormatError> {
        let mut r = ByteReader::new(payload);
        if r.remaining() < CYCLE_RANGE_LEN {
            return Err(FormatError::Truncated {
                needed: CYCLE_RANGE_LEN,
                available: r.remaining(),
            });
        }
        Ok(Self {
            pad: r.read_i16()?,
            rate: r.read_i16()?,
            flags: r.read_i16()?,
            low: r.read_u8()?,
            high: r.read_u8()?,
        })
    }
}

/// Parses the chunk at the start of `bytes`.
///
/// Bytes after the chunk (and its pad byte) are ignored.
///
/// # Errors
///
/// Returns [`FormatError::Truncated`] if the header or the declared payload
/// does not fit in `bytes`, or any error from parsing a known payload.
pub fn parse_chunk(bytes: &[u8]) -> Result<Chunk<'_>, FormatError> {
    let mut r = ByteReader::new(bytes);
    let tag = r.read_tag()?;
    let declared = r.read_u32()?;
    let payload = r.take(usize::try_from(declared).unwrap_or(usize::MAX))?;
    let len = declared.saturating_add(declared & 1);

    let data = match tag {
        Tag::FORM => ChunkData::Container(parse_container(payload)?),
        Tag::BMHD => ChunkData::Header(BitmapHeader::parse(payload)?),
        Tag::CMAP => ChunkData::Palette(ColorMap::parse(payload, declared)?),
        Tag::CRNG => ChunkData::CycleRange(CycleRange::parse(payload)?),
        Tag::BODY => ChunkData::Body(payload),
        _ => ChunkData::Unknown,
    };

    Ok(Chunk { tag, len, data })
}

/// Parses a container payload: form type, then children until at most one
/// pad byte is left.
///
/// # Errors
///
/// Returns the first error from any child.
pub fn parse_container(payload: &[u8]) -> Result<Container<'_>, FormatError> {
    let mut r = ByteReader::new(payload);
    let form_type = r.read_tag()?;
    let mut children = Vec::new();

    while r.remaining() > 1 {
        let child = parse_chunk(r.rest())?;
        // The final child may lack its pad byte.
        r.skip(child.encoded_len().min(r.remaining()))?;
        children.push(child);
    }

    Ok(Container {
        form_type,
        children,
    })
}

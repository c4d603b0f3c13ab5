// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decode errors.
//!
//! [`FormatError`] covers every way a byte buffer can fail to be a usable
//! color-cycling image. [`LoadError`] (with the `std` feature) adds the I/O
//! failures of reading the file in the first place.
//!
//! All of these are fatal to a decode call. Nothing here is retried; callers
//! that want a fallback (e.g. a static image path) pick it themselves.

use core::fmt;

use crate::iff::Tag;

/// The input is not a well-formed, supported indexed-color image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatError {
    /// A read needed more bytes than the input had left.
    Truncated {
        /// Bytes the read required.
        needed: usize,
        /// Bytes that were left.
        available: usize,
    },
    /// The outermost chunk is not a `FORM` container.
    NotAContainer(Tag),
    /// A `CMAP` chunk whose payload is not exactly 256 RGB triples.
    PaletteSize(u32),
    /// A `ByteRun1` control byte of `-128`.
    InvalidRunControl,
    /// A `ByteRun1` run would write past the end of the pixel buffer.
    RunOverflow,
    /// A compression mode other than none (0) or `ByteRun1` (1).
    UnknownCompression(u8),
    /// A bitmap with a bit-plane count other than 8.
    UnsupportedDepth(u8),
    /// A required chunk (`BMHD`, `CMAP` or `BODY`) never appeared.
    MissingChunk(Tag),
    /// The header declares a zero width or height.
    EmptyImage,
    /// `width * height` does not fit the address space.
    ImageTooLarge,
    /// A pixel buffer whose length is not `width * height`.
    PixelCount {
        /// `width * height`.
        expected: usize,
        /// Length of the buffer supplied.
        actual: usize,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { needed, available } => {
                write!(f, "truncated input: needed {needed} bytes, {available} left")
            }
            Self::NotAContainer(tag) => write!(f, "expected a FORM container, found {tag}"),
            Self::PaletteSize(len) => {
                write!(f, "palette chunk is {len} bytes, expected 768")
            }
            Self::InvalidRunControl => f.write_str("run-length control byte -128 is not allowed"),
            Self::RunOverflow => f.write_str("run-length data overflows the pixel buffer"),
            Self::UnknownCompression(mode) => write!(f, "unknown compression mode {mode}"),
            Self::UnsupportedDepth(planes) => {
                write!(f, "unsupported depth of {planes} bit-planes, expected 8")
            }
            Self::MissingChunk(tag) => write!(f, "required {tag} chunk is missing"),
            Self::EmptyImage => f.write_str("image has zero width or height"),
            Self::ImageTooLarge => f.write_str("image dimensions overflow"),
            Self::PixelCount { expected, actual } => {
                write!(f, "pixel buffer holds {actual} bytes, expected {expected}")
            }
        }
    }
}

impl core::error::Error for FormatError {}

/// Failure to load an image from the filesystem.
#[cfg(feature = "std")]
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be opened or read.
    Io(std::io::Error),
    /// The file was read but is not a usable image.
    Format(FormatError),
}

#[cfg(feature = "std")]
impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "could not read image: {err}"),
            Self::Format(err) => write!(f, "could not decode image: {err}"),
        }
    }
}

#[cfg(feature = "std")]
impl core::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Format(err) => Some(err),
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(feature = "std")]
impl From<FormatError> for LoadError {
    fn from(err: FormatError) -> Self {
        Self::Format(err)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::FormatError;
    use crate::iff::Tag;

    #[test]
    fn display_names_the_offending_tag() {
        let msg = FormatError::MissingChunk(Tag::CMAP).to_string();
        assert_eq!(msg, "required CMAP chunk is missing");

        let msg = FormatError::NotAContainer(Tag(*b"BODY")).to_string();
        assert_eq!(msg, "expected a FORM container, found BODY");
    }

    #[test]
    fn display_truncation_reports_counts() {
        let msg = FormatError::Truncated {
            needed: 8,
            available: 3,
        }
        .to_string();
        assert_eq!(msg, "truncated input: needed 8 bytes, 3 left");
    }
}

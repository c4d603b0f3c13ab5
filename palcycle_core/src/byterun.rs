// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `ByteRun1` run-length decoding.
//!
//! `BODY` data is either stored raw or packed with `ByteRun1`, the PackBits
//! variant from the ILBM specification. The packed stream is a sequence of
//! runs, each led by a signed control byte `c`:
//!
//! | `c` | Meaning |
//! |---|---|
//! | `0 ..= 127` | copy the next `c + 1` bytes literally |
//! | `-127 ..= -1` | repeat the next byte `1 - c` times |
//! | `-128` | not allowed |
//!
//! Lengths are stored minus one, so a single control byte covers runs of 1 to
//! 128 bytes.

use crate::error::FormatError;

/// `BODY` compression mode, as stored in the bitmap header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Raw pixel bytes.
    None,
    /// `ByteRun1` run-length packing.
    ByteRun1,
}

impl Compression {
    /// Maps the header's compression byte to a mode.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::UnknownCompression`] for anything but 0 or 1.
    pub const fn from_raw(raw: u8) -> Result<Self, FormatError> {
        match raw {
            0 => Ok(Self::None),
            1 => Ok(Self::ByteRun1),
            other => Err(FormatError::UnknownCompression(other)),
        }
    }

    /// The header byte for this mode.
    #[must_use]
    pub const fn to_raw(self) -> u8 {
        match self {
            Self::None => 0,
            Self::ByteRun1 => 1,
        }
    }
}

/// Fills all of `dst` from `src` using the given compression.
///
/// Source bytes left over once `dst` is full are ignored.
///
/// # Errors
///
/// - [`FormatError::Truncated`] if `src` ends before `dst` is full.
/// - [`FormatError::InvalidRunControl`] on a `-128` control byte.
/// - [`FormatError::RunOverflow`] if a run extends past the end of `dst`.
pub fn unpack(dst: &mut [u8], src: &[u8], mode: Compression) -> Result<(), FormatError> {
    match mode {
        Compression::None => {
            let Some(raw) = src.get(..dst.len()) else {
                return Err(FormatError::Truncated {
                    needed: dst.len(),
                    available: src.len(),
                });
            };
            dst.copy_from_slice(raw);
            Ok(())
        }
        Compression::ByteRun1 => unpack_byte_run(dst, src),
    }
}

fn unpack_byte_run(dst: &mut [u8], src: &[u8]) -> Result<(), FormatError> {
    let mut read = 0;
    let mut written = 0;

    while written < dst.len() {
        let control = i8::from_ne_bytes([byte_at(src, read)?]);
        read += 1;

        match control {
            -128 => return Err(FormatError::InvalidRunControl),
            0.. => {
                let count = usize::from(control.unsigned_abs()) + 1;
                let literal = src.get(read..read + count).ok_or(FormatError::Truncated {
                    needed: count,
                    available: src.len() - read,
                })?;
                run_slot(dst, written, count)?.copy_from_slice(literal);
                read += count;
                written += count;
            }
            _ => {
                let count = usize::from(control.unsigned_abs()) + 1;
                let value = byte_at(src, read)?;
                read += 1;
                run_slot(dst, written, count)?.fill(value);
                written += count;
            }
        }
    }

    Ok(())
}

fn byte_at(src: &[u8], at: usize) -> Result<u8, FormatError> {
    src.get(at).copied().ok_or(FormatError::Truncated {
        needed: 1,
        available: 0,
    })
}

fn run_slot(dst: &mut [u8], at: usize, count: usize) -> Result<&mut [u8], FormatError> {
    dst.get_mut(at..at + count).ok_or(FormatError::RunOverflow)
}

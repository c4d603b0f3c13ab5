// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Builders for synthetic IFF files used by unit tests.

use alloc::vec::Vec;

/// Encodes one chunk, adding the pad byte for odd payloads.
pub(crate) fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 9);
    out.extend_from_slice(tag);
    out.extend_from_slice(&u32::try_from(payload.len()).unwrap().to_be_bytes());
    out.extend_from_slice(payload);
    if payload.len() % 2 == 1 {
        out.push(0);
    }
    out
}

/// Encodes a `FORM` container around already-encoded children.
pub(crate) fn form(form_type: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(form_type);
    for child in children {
        payload.extend_from_slice(child);
    }
    chunk(b"FORM", &payload)
}

/// An 8-plane `BMHD` chunk.
pub(crate) fn header(width: u16, height: u16, compression: u8) -> Vec<u8> {
    header_with_planes(width, height, compression, 8)
}

/// A `BMHD` chunk with an arbitrary bit-plane count.
pub(crate) fn header_with_planes(width: u16, height: u16, compression: u8, planes: u8) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&width.to_be_bytes());
    payload.extend_from_slice(&height.to_be_bytes());
    payload.extend_from_slice(&0_i16.to_be_bytes());
    payload.extend_from_slice(&0_i16.to_be_bytes());
    payload.push(planes);
    payload.push(0);
    payload.push(compression);
    payload.push(0);
    payload.extend_from_slice(&0_u16.to_be_bytes());
    payload.push(1);
    payload.push(1);
    payload.extend_from_slice(&320_i16.to_be_bytes());
    payload.extend_from_slice(&200_i16.to_be_bytes());
    chunk(b"BMHD", &payload)
}

/// A `CMAP` chunk whose entry `i` is `[i, 255 - i, i / 2]`; all distinct.
pub(crate) fn ramp_palette() -> Vec<u8> {
    let mut payload = Vec::with_capacity(768);
    for i in 0..=255_u8 {
        payload.extend_from_slice(&[i, 255 - i, i / 2]);
    }
    chunk(b"CMAP", &payload)
}

/// A `CRNG` chunk.
pub(crate) fn crng(rate: i16, low: u8, high: u8) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&0_i16.to_be_bytes());
    payload.extend_from_slice(&rate.to_be_bytes());
    payload.extend_from_slice(&1_i16.to_be_bytes());
    payload.push(low);
    payload.push(high);
    chunk(b"CRNG", &payload)
}

/// A `BODY` chunk.
pub(crate) fn body(bytes: &[u8]) -> Vec<u8> {
    chunk(b"BODY", bytes)
}

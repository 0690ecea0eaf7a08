// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Byte ↔ bit conversion shared by every embedder.
//!
//! Bits are carried as one `u8` (0 or 1) per element, MSB first within each
//! byte. A sequence whose length is not a multiple of 8 may exist between
//! engines (e.g. the hybrid split point) but never decodes back to bytes.

use crate::stego::error::StegoError;

/// Convert bytes to a bit vector (MSB first).
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for bit_pos in (0..8).rev() {
            bits.push((byte >> bit_pos) & 1);
        }
    }
    bits
}

/// Convert a bit vector (MSB first) back to bytes.
///
/// # Errors
/// [`StegoError::NotByteAligned`] if `bits.len()` is not a multiple of 8.
pub fn bits_to_bytes(bits: &[u8]) -> Result<Vec<u8>, StegoError> {
    if bits.len() % 8 != 0 {
        return Err(StegoError::NotByteAligned(bits.len()));
    }
    Ok(bits
        .chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit & 1)))
        .collect())
}

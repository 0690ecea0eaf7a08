// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Spatial-domain bit-plane substitution.
//!
//! Samples are visited in raster order (rows, columns, then channels) and
//! the low `bits_per_channel` bits of each are replaced by the next message
//! bits, most significant of the allotted bits first. Bits above the
//! substituted plane are never touched.

use crate::image::Image;
use crate::stego::capacity::{ensure_fits, lsb_capacity_bits};
use crate::stego::config::LsbConfig;
use crate::stego::error::StegoError;

/// Embed `bits` into a copy of `cover`.
///
/// Returns the stego image and the number of message bits written, which is
/// always `bits.len()`. When the message ends partway through the final
/// sample, the remaining low bits of that sample repeat the last message bit.
///
/// # Errors
/// - [`StegoError::Config`] if `bits_per_channel` is outside 1–8.
/// - [`StegoError::Capacity`] if `bits.len()` exceeds the cover's capacity.
pub fn lsb_embed(cover: &Image, bits: &[u8], config: &LsbConfig) -> Result<(Image, usize), StegoError> {
    config.validate()?;
    let k = config.bits_per_channel as usize;
    ensure_fits(bits.len(), lsb_capacity_bits(cover, config.bits_per_channel))?;

    tracing::debug!(
        rows = cover.rows(),
        cols = cover.cols(),
        channels = cover.channels(),
        bits = bits.len(),
        bits_per_channel = k,
        "lsb embed"
    );

    let mask = low_mask(k);
    let mut stego = cover.clone();
    for (sample, chunk) in stego.samples_mut().iter_mut().zip(bits.chunks(k)) {
        let last = chunk[chunk.len() - 1] & 1;
        let mut value = 0u8;
        for i in 0..k {
            let bit = chunk.get(i).map_or(last, |&b| b & 1);
            value = (value << 1) | bit;
        }
        *sample = (*sample & !mask) | value;
    }

    Ok((stego, bits.len()))
}

/// Read `bit_length` bits back from the low planes of `stego`.
///
/// # Errors
/// - [`StegoError::Config`] if `bits_per_channel` is outside 1–8.
/// - [`StegoError::Capacity`] if `bit_length` exceeds the image's capacity.
pub fn lsb_extract(stego: &Image, bit_length: usize, config: &LsbConfig) -> Result<Vec<u8>, StegoError> {
    config.validate()?;
    let k = config.bits_per_channel as usize;
    ensure_fits(bit_length, lsb_capacity_bits(stego, config.bits_per_channel))?;

    tracing::debug!(bits = bit_length, bits_per_channel = k, "lsb extract");

    let mut bits = Vec::with_capacity(bit_length);
    let samples_used = bit_length.div_ceil(k);
    for &sample in &stego.samples()[..samples_used] {
        for shift in (0..k).rev() {
            if bits.len() == bit_length {
                break;
            }
            bits.push((sample >> shift) & 1);
        }
    }
    Ok(bits)
}

/// Mask covering the low `k` bits (`k` in 1–8).
fn low_mask(k: usize) -> u8 {
    (((1u16) << k) - 1) as u8
}

// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Carrier capacity arithmetic.
//!
//! Capacities are exact bit counts, not estimates: every engine checks a
//! message against these numbers before it writes anything.

use crate::image::Image;
use crate::stego::config::{DctConfig, EmbeddingConfig, HybridConfig, LsbConfig};
use crate::stego::error::StegoError;

/// Maximum bits the LSB engine can hide: one slot per substituted bit of
/// every sample.
pub fn lsb_capacity_bits(img: &Image, bits_per_channel: u8) -> usize {
    img.len() * bits_per_channel as usize
}

/// Maximum bits the DCT engine can hide.
///
/// One bit per selected coefficient per whole block per channel. Partial
/// blocks along the right and bottom edges are dropped.
pub fn dct_capacity_bits(img: &Image, block_size: usize, num_positions: usize) -> usize {
    if block_size == 0 {
        return 0;
    }
    (img.rows() / block_size) * (img.cols() / block_size) * img.channels() * num_positions
}

/// `(dct_capacity, lsb_capacity)` over the same cover, computed independently.
pub fn hybrid_capacity_bits(img: &Image, config: &HybridConfig) -> Result<(usize, usize), StegoError> {
    Ok((dct_config_capacity(img, &config.dct)?, lsb_config_capacity(img, &config.lsb)?))
}

/// Validated LSB capacity for a config.
pub fn lsb_config_capacity(img: &Image, config: &LsbConfig) -> Result<usize, StegoError> {
    config.validate()?;
    Ok(lsb_capacity_bits(img, config.bits_per_channel))
}

/// Validated DCT capacity for a config.
pub fn dct_config_capacity(img: &Image, config: &DctConfig) -> Result<usize, StegoError> {
    let positions = config.validated_positions()?;
    Ok(dct_capacity_bits(img, config.block_size, positions.len()))
}

/// Total bits any method can carry in `img`.
///
/// For hybrid mode this is the sum of both sub-capacities; whether a given
/// message fits also depends on how `dct_ratio` splits it.
pub fn capacity_bits(img: &Image, config: &EmbeddingConfig) -> Result<usize, StegoError> {
    match config {
        EmbeddingConfig::Lsb(c) => lsb_config_capacity(img, c),
        EmbeddingConfig::Dct(c) => dct_config_capacity(img, c),
        EmbeddingConfig::Hybrid(c) => {
            let (dct, lsb) = hybrid_capacity_bits(img, c)?;
            Ok(dct + lsb)
        }
    }
}

/// Fail with [`StegoError::Capacity`] when `needed > available`.
pub(crate) fn ensure_fits(needed: usize, available: usize) -> Result<(), StegoError> {
    if needed > available {
        return Err(StegoError::Capacity { needed, available });
    }
    Ok(())
}

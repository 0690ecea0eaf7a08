// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Hybrid DCT + LSB embedding.
//!
//! The message is split once, in order: the first `round(dct_ratio * len)`
//! bits go to the DCT engine, the rest to the LSB engine. DCT embedding runs
//! on the full cover first; LSB substitution then runs on the DCT output.
//! Extraction reverses the order: LSB bits are read first, then the DCT
//! engine reads the same image, low bits included.
//!
//! The LSB pass slightly perturbs the block coefficients. With a
//! quantization step well above the low-plane amplitude the QIM decision is
//! unaffected; callers choosing tiny steps must accept the cross-talk.

use crate::image::Image;
use crate::stego::capacity::{ensure_fits, hybrid_capacity_bits};
use crate::stego::config::HybridConfig;
use crate::stego::dct::{dct_embed, dct_extract};
use crate::stego::error::StegoError;
use crate::stego::lsb::{lsb_embed, lsb_extract};

/// Embed `bits` across both domains.
///
/// Both sub-allocations are checked before either engine runs, so a
/// capacity failure never leaves a half-embedded image behind.
///
/// # Errors
/// - [`StegoError::Config`] for an invalid ratio or sub-config.
/// - [`StegoError::Capacity`] if either share exceeds its engine's capacity.
/// - [`StegoError::Unembeddable`] if a block of the DCT share saturates.
pub fn hybrid_embed(cover: &Image, bits: &[u8], config: &HybridConfig) -> Result<(Image, usize), StegoError> {
    config.validate()?;
    let split = config.split_point(bits.len());
    let (dct_bits, lsb_bits) = bits.split_at(split);

    let (dct_cap, lsb_cap) = hybrid_capacity_bits(cover, config)?;
    ensure_fits(dct_bits.len(), dct_cap)?;
    ensure_fits(lsb_bits.len(), lsb_cap)?;

    tracing::debug!(
        total = bits.len(),
        dct_bits = dct_bits.len(),
        lsb_bits = lsb_bits.len(),
        dct_ratio = config.dct_ratio,
        "hybrid embed"
    );

    let (after_dct, _) = dct_embed(cover, dct_bits, &config.dct)?;
    let (stego, _) = lsb_embed(&after_dct, lsb_bits, &config.lsb)?;
    Ok((stego, bits.len()))
}

/// Recover `bit_length` bits embedded by [`hybrid_embed`].
///
/// # Errors
/// Same taxonomy as [`hybrid_embed`], applied to the split of `bit_length`.
pub fn hybrid_extract(stego: &Image, bit_length: usize, config: &HybridConfig) -> Result<Vec<u8>, StegoError> {
    config.validate()?;
    let split = config.split_point(bit_length);
    let lsb_len = bit_length - split;

    let (dct_cap, lsb_cap) = hybrid_capacity_bits(stego, config)?;
    ensure_fits(split, dct_cap)?;
    ensure_fits(lsb_len, lsb_cap)?;

    tracing::debug!(total = bit_length, dct_bits = split, lsb_bits = lsb_len, "hybrid extract");

    let lsb_bits = lsb_extract(stego, lsb_len, &config.lsb)?;
    let mut bits = dct_extract(stego, split, &config.dct)?;
    bits.extend_from_slice(&lsb_bits);
    Ok(bits)
}

// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Steganographic embedding and extraction.
//!
//! Three engines share one embed/extract pair:
//!
//! - **LSB** (`lsb`): spatial bit-plane substitution. Highest capacity,
//!   fragile against any pixel change.
//! - **DCT** (`dct`): parity QIM on chosen mid-frequency coefficients of
//!   fixed-size blocks. Lower capacity, survives mild noise and filtering.
//! - **Hybrid** (`hybrid`): an ordered split of one message across both.
//!
//! [`EmbeddingConfig`] selects the engine. No length header is written into
//! the image: [`embed`] returns the bit length, and [`extract`] needs it
//! back (usually via a [`ParameterRecord`]).

pub mod error;
pub mod config;
pub mod capacity;
pub mod lsb;
pub mod dct;
pub mod hybrid;
pub mod params;
pub mod payload;

pub use error::StegoError;
pub use config::{DctConfig, EmbedPositions, EmbeddingConfig, HybridConfig, LsbConfig, PositionPreset};
pub use params::ParameterRecord;

use crate::bits::{bits_to_bytes, bytes_to_bits};
use crate::image::Image;

/// Output of an embed call.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedResult {
    /// The modified image.
    pub stego: Image,
    /// Number of message bits written. Not stored in the image; the caller
    /// must keep it for extraction.
    pub bit_length: usize,
}

impl EmbedResult {
    /// Parameter record to persist alongside the stego image.
    pub fn parameters(&self, config: &EmbeddingConfig) -> ParameterRecord {
        ParameterRecord::new(config.clone(), self.bit_length)
    }
}

/// Embed a byte message into `cover`.
///
/// # Errors
/// - [`StegoError::Config`] if `config` is invalid.
/// - [`StegoError::Capacity`] if the message does not fit.
/// - [`StegoError::Unembeddable`] if a DCT block saturates (DCT and Hybrid).
pub fn embed(cover: &Image, message: &[u8], config: &EmbeddingConfig) -> Result<EmbedResult, StegoError> {
    embed_bits(cover, &bytes_to_bits(message), config)
}

/// Embed an arbitrary bit sequence into `cover`.
pub fn embed_bits(cover: &Image, bits: &[u8], config: &EmbeddingConfig) -> Result<EmbedResult, StegoError> {
    let (stego, bit_length) = match config {
        EmbeddingConfig::Lsb(c) => lsb::lsb_embed(cover, bits, c)?,
        EmbeddingConfig::Dct(c) => dct::dct_embed(cover, bits, c)?,
        EmbeddingConfig::Hybrid(c) => hybrid::hybrid_embed(cover, bits, c)?,
    };
    Ok(EmbedResult { stego, bit_length })
}

/// Recover a byte message of `bit_length` bits.
///
/// # Errors
/// - [`StegoError::Config`] / [`StegoError::Capacity`] as for [`extract_bits`].
/// - [`StegoError::NotByteAligned`] if `bit_length` is not a multiple of 8.
pub fn extract(stego: &Image, bit_length: usize, config: &EmbeddingConfig) -> Result<Vec<u8>, StegoError> {
    if bit_length % 8 != 0 {
        return Err(StegoError::NotByteAligned(bit_length));
    }
    bits_to_bytes(&extract_bits(stego, bit_length, config)?)
}

/// Recover `bit_length` raw bits.
pub fn extract_bits(stego: &Image, bit_length: usize, config: &EmbeddingConfig) -> Result<Vec<u8>, StegoError> {
    match config {
        EmbeddingConfig::Lsb(c) => lsb::lsb_extract(stego, bit_length, c),
        EmbeddingConfig::Dct(c) => dct::dct_extract(stego, bit_length, c),
        EmbeddingConfig::Hybrid(c) => hybrid::hybrid_extract(stego, bit_length, c),
    }
}

/// Recover a byte message using a persisted parameter record.
pub fn extract_with_record(stego: &Image, record: &ParameterRecord) -> Result<Vec<u8>, StegoError> {
    extract(stego, record.message_bit_length, &record.config)
}

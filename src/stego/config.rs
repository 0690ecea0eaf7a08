// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Embedding configuration.
//!
//! [`EmbeddingConfig`] is a tagged variant selecting one of the three
//! engines. Each sub-config validates its own ranges; the engines call
//! `validate()` before touching the cover so a bad parameter never produces
//! a partially written image.
//!
//! The serde representation is the persisted parameter format:
//!
//! ```text
//! {"method":"LSB","bit_plane":1}
//! {"method":"DCT","block_size":8,"quant_factor":70,"embed_positions":"mid_band"}
//! {"method":"Hybrid","dct_ratio":0.5,"dct":{...},"lsb":{"bit_plane":1}}
//! ```

use serde::{Deserialize, Serialize};

use crate::stego::error::StegoError;

/// DCT block edge lengths the engine accepts.
pub const BLOCK_SIZES: [usize; 4] = [4, 8, 12, 16];

/// Largest accepted quantization step.
pub const MAX_QUANT_FACTOR: u32 = 100;

/// Spatial bit-plane substitution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsbConfig {
    /// Number of low bits replaced in every sample (1–8).
    #[serde(rename = "bit_plane")]
    pub bits_per_channel: u8,
}

impl Default for LsbConfig {
    fn default() -> Self {
        Self { bits_per_channel: 1 }
    }
}

impl LsbConfig {
    pub fn new(bits_per_channel: u8) -> Self {
        Self { bits_per_channel }
    }

    pub fn validate(&self) -> Result<(), StegoError> {
        if !(1..=8).contains(&self.bits_per_channel) {
            return Err(StegoError::config(format!(
                "bits_per_channel must be in 1..=8, got {}",
                self.bits_per_channel
            )));
        }
        Ok(())
    }
}

/// Named sets of mid-frequency coefficient positions.
///
/// Every preset fits inside the smallest block size (4×4) and skips the DC
/// and first-order AC terms (`row + col >= 2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionPreset {
    /// One coefficient per block.
    Single,
    /// Five mid-band coefficients around the anti-diagonal.
    MidBand,
    /// The main diagonal below DC.
    Diagonal,
    /// Every coefficient with `2 <= row + col <= 4` inside a 4×4 block.
    Wide,
}

impl PositionPreset {
    /// Coordinates in embedding order.
    pub fn positions(self) -> &'static [(usize, usize)] {
        match self {
            Self::Single => &[(2, 1)],
            Self::MidBand => &[(2, 1), (1, 2), (2, 2), (3, 1), (1, 3)],
            Self::Diagonal => &[(1, 1), (2, 2), (3, 3)],
            Self::Wide => &[
                (2, 0), (1, 1), (0, 2),
                (3, 0), (2, 1), (1, 2), (0, 3),
                (3, 1), (2, 2), (1, 3),
            ],
        }
    }
}

/// Coefficient positions: a named preset or an explicit ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbedPositions {
    Preset(PositionPreset),
    Explicit(Vec<(usize, usize)>),
}

impl EmbedPositions {
    /// Resolve to the ordered coordinate list extraction must replay.
    pub fn resolve(&self) -> Vec<(usize, usize)> {
        match self {
            Self::Preset(p) => p.positions().to_vec(),
            Self::Explicit(list) => list.clone(),
        }
    }
}

impl From<PositionPreset> for EmbedPositions {
    fn from(p: PositionPreset) -> Self {
        Self::Preset(p)
    }
}

impl From<Vec<(usize, usize)>> for EmbedPositions {
    fn from(list: Vec<(usize, usize)>) -> Self {
        Self::Explicit(list)
    }
}

/// Block-DCT quantization-index-modulation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DctConfig {
    /// Block edge length, one of [`BLOCK_SIZES`].
    pub block_size: usize,
    /// Quantization step applied to every selected coefficient (1–100).
    pub quant_factor: u32,
    pub embed_positions: EmbedPositions,
}

impl Default for DctConfig {
    fn default() -> Self {
        Self {
            block_size: 8,
            quant_factor: 70,
            embed_positions: EmbedPositions::Preset(PositionPreset::MidBand),
        }
    }
}

impl DctConfig {
    pub fn new(block_size: usize, quant_factor: u32, embed_positions: impl Into<EmbedPositions>) -> Self {
        Self {
            block_size,
            quant_factor,
            embed_positions: embed_positions.into(),
        }
    }

    /// Validate ranges and return the resolved position list.
    pub fn validated_positions(&self) -> Result<Vec<(usize, usize)>, StegoError> {
        if !BLOCK_SIZES.contains(&self.block_size) {
            return Err(StegoError::config(format!(
                "block_size must be one of {BLOCK_SIZES:?}, got {}",
                self.block_size
            )));
        }
        if self.quant_factor == 0 || self.quant_factor > MAX_QUANT_FACTOR {
            return Err(StegoError::config(format!(
                "quant_factor must be in 1..={MAX_QUANT_FACTOR}, got {}",
                self.quant_factor
            )));
        }
        let positions = self.embed_positions.resolve();
        if positions.is_empty() {
            return Err(StegoError::config("embed_positions must not be empty"));
        }
        for (i, &(row, col)) in positions.iter().enumerate() {
            if row >= self.block_size || col >= self.block_size {
                return Err(StegoError::config(format!(
                    "position ({row},{col}) lies outside a {0}x{0} block",
                    self.block_size
                )));
            }
            if row + col < 2 {
                return Err(StegoError::config(format!(
                    "position ({row},{col}) is too low-frequency (row + col must be >= 2)"
                )));
            }
            if positions[..i].contains(&(row, col)) {
                return Err(StegoError::config(format!("position ({row},{col}) listed twice")));
            }
        }
        Ok(positions)
    }

    pub fn validate(&self) -> Result<(), StegoError> {
        self.validated_positions().map(|_| ())
    }
}

/// Split of one payload between the DCT and LSB engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridConfig {
    /// Fraction of message bits routed to the DCT engine (0.0–1.0).
    pub dct_ratio: f64,
    pub dct: DctConfig,
    pub lsb: LsbConfig,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            dct_ratio: 0.5,
            dct: DctConfig::default(),
            lsb: LsbConfig::default(),
        }
    }
}

impl HybridConfig {
    pub fn validate(&self) -> Result<(), StegoError> {
        if !self.dct_ratio.is_finite() || !(0.0..=1.0).contains(&self.dct_ratio) {
            return Err(StegoError::config(format!(
                "dct_ratio must be in [0, 1], got {}",
                self.dct_ratio
            )));
        }
        self.dct.validate()?;
        self.lsb.validate()
    }

    /// Number of leading message bits that go to the DCT engine.
    pub fn split_point(&self, total_bits: usize) -> usize {
        ((self.dct_ratio * total_bits as f64).round() as usize).min(total_bits)
    }
}

/// Engine selection plus that engine's settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum EmbeddingConfig {
    #[serde(rename = "LSB")]
    Lsb(LsbConfig),
    #[serde(rename = "DCT")]
    Dct(DctConfig),
    #[serde(rename = "Hybrid")]
    Hybrid(HybridConfig),
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self::Lsb(LsbConfig::default())
    }
}

impl EmbeddingConfig {
    /// Short method name as written to the parameter record.
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::Lsb(_) => "LSB",
            Self::Dct(_) => "DCT",
            Self::Hybrid(_) => "Hybrid",
        }
    }

    pub fn validate(&self) -> Result<(), StegoError> {
        match self {
            Self::Lsb(c) => c.validate(),
            Self::Dct(c) => c.validate(),
            Self::Hybrid(c) => c.validate(),
        }
    }
}

impl From<LsbConfig> for EmbeddingConfig {
    fn from(c: LsbConfig) -> Self {
        Self::Lsb(c)
    }
}

impl From<DctConfig> for EmbeddingConfig {
    fn from(c: DctConfig) -> Self {
        Self::Dct(c)
    }
}

impl From<HybridConfig> for EmbeddingConfig {
    fn from(c: HybridConfig) -> Self {
        Self::Hybrid(c)
    }
}

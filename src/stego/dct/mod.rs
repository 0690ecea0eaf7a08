// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Block-DCT embedding and extraction.
//!
//! Each channel is cut into non-overlapping `block_size × block_size` blocks
//! (trailing partial blocks are ignored). One message bit is carried by each
//! selected coefficient of each block via parity QIM (see [`qim`]).
//!
//! Bit order: channels in declared order, blocks in raster order within a
//! channel, then positions in the configured order. Extraction replays the
//! same walk, so no side information beyond the bit length is needed.
//!
//! Every marked block is checked after it is rounded and clamped to 8-bit
//! samples. A block whose parities did not survive is repaired (DC shift
//! back into range, single-sample nudges, coefficient pre-compensation); if
//! that fails the embed returns [`StegoError::Unembeddable`] rather than an
//! image that does not decode.
//!
//! Blocks never alias, so per-block work runs on the rayon pool and results
//! are written back by block index.

pub mod qim;
pub mod transform;

use rayon::prelude::*;

use crate::image::{clamp_sample, Image};
use crate::stego::capacity::{dct_capacity_bits, ensure_fits};
use crate::stego::config::DctConfig;
use crate::stego::error::StegoError;
use transform::DctBasis;

/// Repair rounds per block before the embed gives up.
const MAX_REPAIR_PASSES: usize = 4;

/// Whole-block tiling of one channel plane.
#[derive(Debug, Clone, Copy)]
struct BlockGrid {
    /// Block edge length.
    n: usize,
    /// Plane width in samples.
    width: usize,
    blocks_wide: usize,
    blocks_tall: usize,
}

impl BlockGrid {
    fn new(img: &Image, n: usize) -> Self {
        Self {
            n,
            width: img.cols(),
            blocks_wide: img.cols() / n,
            blocks_tall: img.rows() / n,
        }
    }

    fn total_blocks(&self) -> usize {
        self.blocks_wide * self.blocks_tall
    }

    /// Top-left sample of block `k` (raster order).
    fn origin(&self, k: usize) -> (usize, usize) {
        debug_assert!(k < self.total_blocks());
        ((k / self.blocks_wide) * self.n, (k % self.blocks_wide) * self.n)
    }

    fn read(&self, plane: &[f64], k: usize) -> Vec<f64> {
        let (y0, x0) = self.origin(k);
        let mut block = Vec::with_capacity(self.n * self.n);
        for row in 0..self.n {
            let start = (y0 + row) * self.width + x0;
            block.extend_from_slice(&plane[start..start + self.n]);
        }
        block
    }

    fn write(&self, plane: &mut [f64], k: usize, block: &[f64]) {
        let (y0, x0) = self.origin(k);
        for row in 0..self.n {
            let start = (y0 + row) * self.width + x0;
            plane[start..start + self.n].copy_from_slice(&block[row * self.n..(row + 1) * self.n]);
        }
    }
}

/// Embed `bits` into a copy of `cover` using block-DCT parity QIM.
///
/// Only blocks that receive message bits are transformed; all other samples
/// are copied unchanged. Reconstructed samples are rounded and clamped to
/// `[0, 255]`, and every marked block is verified to decode afterwards.
///
/// # Errors
/// - [`StegoError::Config`] for an invalid block size, quantization factor
///   or position set.
/// - [`StegoError::Capacity`] if `bits.len()` exceeds the block capacity.
/// - [`StegoError::Unembeddable`] if a block cannot hold its bits in 8-bit
///   samples.
pub fn dct_embed(cover: &Image, bits: &[u8], config: &DctConfig) -> Result<(Image, usize), StegoError> {
    let positions = config.validated_positions()?;
    let n = config.block_size;
    ensure_fits(bits.len(), dct_capacity_bits(cover, n, positions.len()))?;

    tracing::debug!(
        rows = cover.rows(),
        cols = cover.cols(),
        channels = cover.channels(),
        bits = bits.len(),
        block_size = n,
        quant_factor = config.quant_factor,
        positions = positions.len(),
        "dct embed"
    );

    let mut stego = cover.clone();
    if bits.is_empty() {
        return Ok((stego, 0));
    }

    let grid = BlockGrid::new(cover, n);
    let basis = DctBasis::new(n);
    let step = config.quant_factor as f64;
    let bits_per_channel = grid.total_blocks() * positions.len();

    for (ch, channel_bits) in bits.chunks(bits_per_channel).enumerate() {
        let mut plane = cover.channel_plane(ch);
        let blocks: Vec<(usize, Vec<f64>)> = channel_bits
            .par_chunks(positions.len())
            .enumerate()
            .map(|(k, block_bits)| {
                embed_block(&basis, &grid.read(&plane, k), &positions, block_bits, step)
                    .map(|block| (k, block))
                    .ok_or(StegoError::Unembeddable { channel: ch, block: k })
            })
            .collect::<Result<_, _>>()?;
        for (k, block) in &blocks {
            grid.write(&mut plane, *k, block);
        }
        stego.set_channel_plane(ch, &plane);
    }

    Ok((stego, bits.len()))
}

/// Coefficient index, bit and target value of one marked position.
type Mark = (usize, u8, f64);

/// Embed one block's bits and return its 8-bit samples, or `None` if the
/// parities cannot be held once the block is rounded and clamped.
fn embed_block(
    basis: &DctBasis,
    pixels: &[f64],
    positions: &[(usize, usize)],
    bits: &[u8],
    step: f64,
) -> Option<Vec<f64>> {
    let n = basis.size();
    let mut coeffs = basis.forward(pixels);
    let marks: Vec<Mark> = positions
        .iter()
        .zip(bits)
        .map(|(&(row, col), &bit)| {
            let idx = row * n + col;
            coeffs[idx] = qim::embed_bit(coeffs[idx], bit, step);
            (idx, bit, coeffs[idx])
        })
        .collect();

    for _ in 0..MAX_REPAIR_PASSES {
        let mut block = settle(basis.inverse(&coeffs));
        if holds(&basis.forward(&block), &marks, step) {
            return Some(block);
        }
        nudge(basis, &mut block, &marks);
        let actual = basis.forward(&block);
        if holds(&actual, &marks, step) {
            return Some(block);
        }
        // Aim past each target by what rounding and clamping took off.
        for &(idx, _, target) in &marks {
            coeffs[idx] += target - actual[idx];
        }
    }
    None
}

/// True if every mark reads back from the coefficients `actual`.
fn holds(actual: &[f64], marks: &[Mark], step: f64) -> bool {
    marks.iter().all(|&(idx, bit, _)| qim::extract_bit(actual[idx], step) == bit)
}

/// Round and clamp a reconstructed block to 8-bit samples. A block that
/// spills out of `[0, 255]` but spans at most 255 is first shifted back in,
/// which only moves its DC term.
fn settle(mut block: Vec<f64>) -> Vec<f64> {
    let (lo, hi) = block
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let shift = if hi - lo > 255.0 {
        0.0
    } else if lo < 0.0 {
        -lo
    } else if hi > 255.0 {
        255.0 - hi
    } else {
        0.0
    };
    for v in &mut block {
        *v = clamp_sample(*v + shift) as f64;
    }
    block
}

/// Greedy ±1 sample changes that pull the marked coefficients toward their
/// targets, stopping when no single change lowers the squared error.
fn nudge(basis: &DctBasis, block: &mut [f64], marks: &[Mark]) {
    let actual = basis.forward(block);
    let mut err: Vec<f64> = marks.iter().map(|&(idx, _, target)| actual[idx] - target).collect();
    let mut energy: f64 = err.iter().map(|e| e * e).sum();

    for _ in 0..2 * block.len() {
        let mut best: Option<(usize, f64, f64)> = None;
        for (i, &v) in block.iter().enumerate() {
            for delta in [-1.0, 1.0] {
                if !(0.0..=255.0).contains(&(v + delta)) {
                    continue;
                }
                let e: f64 = marks
                    .iter()
                    .zip(&err)
                    .map(|(&(idx, _, _), &off)| {
                        let moved = off + delta * basis.weight(idx, i);
                        moved * moved
                    })
                    .sum();
                if e < best.map_or(energy, |(_, _, b)| b) {
                    best = Some((i, delta, e));
                }
            }
        }
        let Some((i, delta, e)) = best else { break };
        block[i] += delta;
        for (&(idx, _, _), err) in marks.iter().zip(err.iter_mut()) {
            *err += delta * basis.weight(idx, i);
        }
        energy = e;
    }
}

/// Recover `bit_length` bits from `stego` without the cover.
///
/// # Errors
/// - [`StegoError::Config`] for an invalid configuration.
/// - [`StegoError::Capacity`] if `bit_length` exceeds the block capacity.
pub fn dct_extract(stego: &Image, bit_length: usize, config: &DctConfig) -> Result<Vec<u8>, StegoError> {
    let positions = config.validated_positions()?;
    let n = config.block_size;
    ensure_fits(bit_length, dct_capacity_bits(stego, n, positions.len()))?;

    tracing::debug!(bits = bit_length, block_size = n, quant_factor = config.quant_factor, "dct extract");

    let grid = BlockGrid::new(stego, n);
    let basis = DctBasis::new(n);
    let step = config.quant_factor as f64;

    let mut bits = Vec::with_capacity(bit_length);
    for ch in 0..stego.channels() {
        if bits.len() >= bit_length {
            break;
        }
        let remaining = bit_length - bits.len();
        let blocks_needed = remaining.div_ceil(positions.len()).min(grid.total_blocks());
        let plane = stego.channel_plane(ch);
        let per_block: Vec<Vec<u8>> = (0..blocks_needed)
            .into_par_iter()
            .map(|k| {
                let coeffs = basis.forward(&grid.read(&plane, k));
                positions
                    .iter()
                    .map(|&(row, col)| qim::extract_bit(coeffs[row * n + col], step))
                    .collect()
            })
            .collect();
        bits.extend(per_block.into_iter().flatten());
    }
    bits.truncate(bit_length);
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{bits_to_bytes, bytes_to_bits};
    use crate::stego::config::PositionPreset;

    /// Smooth mid-range texture that never nears the clamp limits.
    fn cover(rows: usize, cols: usize, channels: usize) -> Image {
        Image::from_fn(rows, cols, channels, |r, c, ch| {
            let v = 128.0 + 30.0 * ((r as f64 * 0.31 + ch as f64).sin() + (c as f64 * 0.17).cos());
            v.round() as u8
        })
    }

    #[test]
    fn uniform_block_parity_flip() {
        let flat = Image::filled(8, 8, 1, 128);
        let cfg = DctConfig::new(8, 70, vec![(2, 1)]);

        let (one, _) = dct_embed(&flat, &[1], &cfg).unwrap();
        assert_ne!(one, flat, "bit 1 on a flat block must change it");
        assert_eq!(dct_extract(&one, 1, &cfg).unwrap(), vec![1]);

        let basis = DctBasis::new(8);
        let coeffs = basis.forward(&one.channel_plane(0));
        assert_eq!(qim::quant_index(coeffs[2 * 8 + 1], 70.0), 1);

        // Embedding 0 into the marked block flips parity back, no cover needed.
        let (zero, _) = dct_embed(&one, &[0], &cfg).unwrap();
        assert_eq!(dct_extract(&zero, 1, &cfg).unwrap(), vec![0]);

        // Bit 0 on the original flat block is already even: nothing moves.
        let (unchanged, _) = dct_embed(&flat, &[0], &cfg).unwrap();
        assert_eq!(unchanged, flat);
    }

    #[test]
    fn roundtrip_all_block_sizes() {
        let img = cover(64, 64, 3);
        let msg = b"block transform payload";
        let bits = bytes_to_bits(msg);
        for n in [4usize, 8, 12, 16] {
            let cfg = DctConfig::new(n, 40, PositionPreset::MidBand);
            let (stego, written) = dct_embed(&img, &bits, &cfg).unwrap();
            let recovered = dct_extract(&stego, written, &cfg).unwrap();
            assert_eq!(bits_to_bytes(&recovered).unwrap(), msg.to_vec(), "block size {n}");
        }
    }

    #[test]
    fn crosses_channel_boundary() {
        // 16x16x3 with 8x8 blocks and 1 position: 4 bits per channel.
        let img = cover(16, 16, 3);
        let cfg = DctConfig::new(8, 50, PositionPreset::Single);
        let bits = vec![1, 0, 1, 1, 0, 1, 0, 0, 1, 1];
        let (stego, _) = dct_embed(&img, &bits, &cfg).unwrap();
        assert_eq!(dct_extract(&stego, bits.len(), &cfg).unwrap(), bits);
        // Blue channel's last two blocks carry nothing and stay untouched.
        for r in 8..16 {
            for c in 0..16 {
                assert_eq!(stego.get(r, c, 2), img.get(r, c, 2));
            }
        }
    }

    #[test]
    fn partial_edge_blocks_untouched() {
        let img = cover(20, 21, 1);
        let cfg = DctConfig::new(8, 40, PositionPreset::Diagonal);
        let cap = dct_capacity_bits(&img, 8, 3);
        assert_eq!(cap, 12);
        let bits: Vec<u8> = (0..cap).map(|i| (i % 2) as u8).collect();
        let (stego, _) = dct_embed(&img, &bits, &cfg).unwrap();
        for r in 0..20 {
            for c in 0..21 {
                if r >= 16 || c >= 16 {
                    assert_eq!(stego.get(r, c, 0), img.get(r, c, 0), "edge sample ({r},{c}) changed");
                }
            }
        }
        assert_eq!(dct_extract(&stego, cap, &cfg).unwrap(), bits);
    }

    #[test]
    fn capacity_boundary() {
        let img = cover(16, 16, 3);
        let cfg = DctConfig::new(8, 40, PositionPreset::MidBand);
        let cap = dct_capacity_bits(&img, 8, 5);
        assert_eq!(cap, 60);
        let bits: Vec<u8> = (0..cap).map(|i| ((i * 7) % 3 == 0) as u8).collect();
        let (stego, _) = dct_embed(&img, &bits, &cfg).unwrap();
        assert_eq!(dct_extract(&stego, cap, &cfg).unwrap(), bits);

        let over = vec![0u8; cap + 1];
        assert!(matches!(dct_embed(&img, &over, &cfg), Err(StegoError::Capacity { needed: 61, available: 60 })));
        assert!(matches!(dct_extract(&img, cap + 1, &cfg), Err(StegoError::Capacity { .. })));
    }

    #[test]
    fn saturated_covers_roundtrip() {
        let cfg = DctConfig::new(8, 70, PositionPreset::MidBand);
        for value in [0u8, 255] {
            let flat = Image::filled(16, 16, 3, value);
            let cap = dct_capacity_bits(&flat, 8, 5);
            let bits: Vec<u8> = (0..cap).map(|i| ((i * 5 + 1) % 3 == 0) as u8).collect();
            let (stego, _) = dct_embed(&flat, &bits, &cfg).unwrap();
            assert_eq!(dct_extract(&stego, cap, &cfg).unwrap(), bits, "flat {value}");
        }
    }

    #[test]
    fn unit_steps_survive_rounding() {
        let img = cover(32, 32, 3);
        for q in [1u32, 2, 3] {
            let cfg = DctConfig::new(8, q, PositionPreset::MidBand);
            let cap = dct_capacity_bits(&img, 8, 5);
            let bits: Vec<u8> = (0..cap).map(|i| ((i * 11 + q as usize) % 7 < 3) as u8).collect();
            let (stego, _) = dct_embed(&img, &bits, &cfg).unwrap();
            assert_eq!(dct_extract(&stego, cap, &cfg).unwrap(), bits, "q={q}");
        }
    }

    #[test]
    fn settle_shifts_spill_back_into_range() {
        let low = settle(vec![-10.2, 5.0, 100.0, 3.0]);
        assert_eq!(low, vec![0.0, 15.0, 110.0, 13.0]);
        let high = settle(vec![250.0, 262.0, 200.0, 255.0]);
        assert_eq!(high, vec![243.0, 255.0, 193.0, 248.0]);
        // Too wide to fit: plain clamping.
        let wide = settle(vec![-20.0, 300.0]);
        assert_eq!(wide, vec![0.0, 255.0]);
    }

    #[test]
    fn nudge_pulls_marks_toward_targets() {
        let basis = DctBasis::new(8);
        let block = vec![100.0; 64];
        let mut moved = block.clone();
        let marks = [(2 * 8 + 1, 1u8, 0.8), (8 + 2, 0u8, -0.6)];
        nudge(&basis, &mut moved, &marks);
        let actual = basis.forward(&moved);
        for &(idx, _, target) in &marks {
            assert!((actual[idx] - target).abs() < 0.4, "coeff {idx}: {}", actual[idx]);
        }
        assert!(moved.iter().all(|v| v.fract() == 0.0));
    }

    #[test]
    fn config_errors() {
        let img = cover(16, 16, 1);
        let zero_q = DctConfig::new(8, 0, PositionPreset::Single);
        assert!(matches!(dct_embed(&img, &[1], &zero_q), Err(StegoError::Config(_))));
        let empty = DctConfig::new(8, 40, Vec::new());
        assert!(matches!(dct_extract(&img, 1, &empty), Err(StegoError::Config(_))));
    }
}

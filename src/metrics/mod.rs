// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Imperceptibility and robustness evaluation.
//!
//! Independent of the embedding engines: quality metrics compare two
//! images, BER compares two bit sequences, and the robustness battery only
//! needs an extraction closure.

pub mod attacks;
pub mod ber;
pub mod quality;
pub mod robustness;

pub use attacks::{standard_attacks, Attack, ATTACK_COUNT};
pub use ber::bit_error_rate;
pub use quality::{mse, psnr, ssim};
pub use robustness::{run_robustness_battery, AttackOutcome, DEFAULT_ATTACK_SEED};

use crate::image::Image;
use crate::stego::{extract_bits, EmbeddingConfig, StegoError};

/// Cover-vs-stego distortion scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Imperceptibility {
    pub mse: f64,
    /// dB; `+inf` when the images are identical.
    pub psnr: f64,
    pub ssim: f64,
}

/// MSE, PSNR and SSIM between a cover and its stego image.
///
/// # Errors
/// [`StegoError::Shape`] if the images differ in shape.
pub fn compute_imperceptibility(cover: &Image, stego: &Image) -> Result<Imperceptibility, StegoError> {
    let mse = quality::mse(cover, stego)?;
    Ok(Imperceptibility {
        mse,
        psnr: quality::psnr_from_mse(mse),
        ssim: quality::ssim(cover, stego)?,
    })
}

/// BER per attack of the standard battery, in catalog order.
///
/// Extraction reads `original_bits.len()` bits with `config` after each
/// attack.
pub fn compute_robustness(
    stego: &Image,
    original_bits: &[u8],
    config: &EmbeddingConfig,
) -> Result<Vec<AttackOutcome>, StegoError> {
    config.validate()?;
    let bit_length = original_bits.len();
    run_robustness_battery(
        stego,
        &standard_attacks(),
        DEFAULT_ATTACK_SEED,
        |attacked| extract_bits(attacked, bit_length, config),
        original_bits,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stego::{embed, LsbConfig};

    #[test]
    fn imperceptibility_of_identical_images() {
        let img = Image::from_fn(16, 16, 3, |r, c, ch| (r * 16 + c + ch) as u8);
        let scores = compute_imperceptibility(&img, &img).unwrap();
        assert_eq!(scores.mse, 0.0);
        assert!(scores.psnr.is_infinite());
        assert!((scores.ssim - 1.0).abs() < 1e-12);
    }

    #[test]
    fn robustness_report_has_32_rows() {
        let img = Image::from_fn(16, 16, 3, |r, c, ch| (64 + r * 4 + c * 2 + ch) as u8);
        let config = EmbeddingConfig::Lsb(LsbConfig::new(1));
        let result = embed(&img, b"robust?", &config).unwrap();
        let bits = crate::bits::bytes_to_bits(b"robust?");
        let report = compute_robustness(&result.stego, &bits, &config).unwrap();
        assert_eq!(report.len(), ATTACK_COUNT);
        assert!(report.iter().all(|o| (0.0..=1.0).contains(&o.ber)));
        // LSB carries nothing through a 25% crop of the top rows.
        let crop = report.iter().find(|o| o.attack == "crop_25pct").unwrap();
        assert!(crop.ber > 0.0);
    }
}

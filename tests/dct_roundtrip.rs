// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Round-trip, boundary and survival tests for DCT mode.

use hybstego_core::bits::bytes_to_bits;
use hybstego_core::metrics::{compute_robustness, mse};
use hybstego_core::{
    dct_capacity_bits, embed, embed_bits, extract, extract_bits, DctConfig, EmbeddingConfig, Image, PositionPreset,
    StegoError,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Smooth mid-grey texture with light seeded noise, kept clear of 0 and 255.
fn textured_cover(rows: usize, cols: usize, seed: u64) -> Image {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    Image::from_fn(rows, cols, 3, |r, c, ch| {
        let base = 128.0 + 25.0 * (r as f64 * 0.2 + ch as f64).sin() + 20.0 * (c as f64 * 0.13).cos();
        (base + rng.gen_range(-8.0..8.0)).round() as u8
    })
}

fn random_message(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen()).collect()
}

#[test]
fn dct_roundtrip_presets_and_block_sizes() {
    let cover = textured_cover(64, 64, 11);
    let presets = [PositionPreset::Single, PositionPreset::MidBand, PositionPreset::Diagonal, PositionPreset::Wide];
    for n in [4usize, 8, 12, 16] {
        for preset in presets {
            let dct = DctConfig::new(n, 30, preset);
            let cap = dct_capacity_bits(&cover, n, preset.positions().len());
            let msg = random_message((cap / 8).min(40), n as u64);
            let config = EmbeddingConfig::Dct(dct);
            let result = embed(&cover, &msg, &config).unwrap();
            let back = extract(&result.stego, result.bit_length, &config).unwrap();
            assert_eq!(back, msg, "n={n} preset={preset:?}");
        }
    }
}

#[test]
fn dct_uniform_block_scenario() {
    let flat = Image::filled(8, 8, 3, 128);
    let config = EmbeddingConfig::Dct(DctConfig::new(8, 70, vec![(2, 1)]));

    let first = embed_bits(&flat, &[1], &config).unwrap();
    assert_eq!(extract_bits(&first.stego, 1, &config).unwrap(), vec![1]);

    // Re-embed into the stego image, then back again: each call is read
    // correctly without ever seeing the original block.
    let second = embed_bits(&first.stego, &[0], &config).unwrap();
    assert_eq!(extract_bits(&second.stego, 1, &config).unwrap(), vec![0]);
    let third = embed_bits(&second.stego, &[1], &config).unwrap();
    assert_eq!(extract_bits(&third.stego, 1, &config).unwrap(), vec![1]);

    // Deterministic: same input, same output.
    assert_eq!(embed_bits(&flat, &[1], &config).unwrap(), first);
}

#[test]
fn dct_exact_capacity_then_one_more() {
    let cover = textured_cover(24, 40, 5);
    let dct = DctConfig::new(8, 40, PositionPreset::MidBand);
    let cap = dct_capacity_bits(&cover, 8, 5);
    assert_eq!(cap, 3 * 5 * 3 * 5);

    let config = EmbeddingConfig::Dct(dct);
    let mut rng = ChaCha20Rng::seed_from_u64(8);
    let bits: Vec<u8> = (0..cap).map(|_| rng.gen_range(0..2u8)).collect();
    let result = embed_bits(&cover, &bits, &config).unwrap();
    assert_eq!(extract_bits(&result.stego, cap, &config).unwrap(), bits);

    let mut over = bits.clone();
    over.push(1);
    assert_eq!(
        embed_bits(&cover, &over, &config).unwrap_err(),
        StegoError::Capacity { needed: cap + 1, available: cap }
    );
}

#[test]
fn dct_zero_quant_factor_is_config_error() {
    let cover = textured_cover(16, 16, 1);
    let config = EmbeddingConfig::Dct(DctConfig::new(8, 0, PositionPreset::Single));
    assert!(matches!(embed(&cover, b"x", &config), Err(StegoError::Config(_))));
}

#[test]
fn dct_survives_mild_noise_and_brightness() {
    let cover = textured_cover(64, 64, 21);
    let config = EmbeddingConfig::Dct(DctConfig::new(8, 70, PositionPreset::Single));
    let msg = random_message(24, 3);
    let result = embed(&cover, &msg, &config).unwrap();
    let bits = bytes_to_bits(&msg);

    let report = compute_robustness(&result.stego, &bits, &config).unwrap();
    let ber = |name: &str| report.iter().find(|o| o.attack == name).map(|o| o.ber).unwrap();
    assert_eq!(ber("gaussian_noise_sigma1"), 0.0);
    assert_eq!(ber("brightness_+10"), 0.0);
    assert_eq!(ber("brightness_-10"), 0.0);
}

#[test]
fn dct_is_less_visible_with_smaller_step() {
    let cover = textured_cover(32, 32, 4);
    let msg = random_message(20, 4);
    let coarse = EmbeddingConfig::Dct(DctConfig::new(8, 90, PositionPreset::MidBand));
    let fine = EmbeddingConfig::Dct(DctConfig::new(8, 20, PositionPreset::MidBand));
    let m_coarse = mse(&cover, &embed(&cover, &msg, &coarse).unwrap().stego).unwrap();
    let m_fine = mse(&cover, &embed(&cover, &msg, &fine).unwrap().stego).unwrap();
    assert!(m_fine < m_coarse, "fine {m_fine} vs coarse {m_coarse}");
}

/// Hard black/white edges on top of flat extremes.
fn checker_cover(rows: usize, cols: usize) -> Image {
    Image::from_fn(rows, cols, 3, |r, c, _| if (r / 3 + c / 5) % 2 == 0 { 0 } else { 255 })
}

#[test]
fn dct_saturated_covers_roundtrip() {
    let config = EmbeddingConfig::Dct(DctConfig::new(8, 70, PositionPreset::MidBand));
    for value in [0u8, 255] {
        let cover = Image::filled(16, 16, 3, value);
        let msg = random_message(7, value as u64);
        let result = embed(&cover, &msg, &config).unwrap();
        assert_eq!(extract(&result.stego, result.bit_length, &config).unwrap(), msg, "flat {value}");
    }
}

#[test]
fn dct_unit_quant_factor_roundtrip() {
    let cover = textured_cover(32, 40, 9);
    let config = EmbeddingConfig::Dct(DctConfig::new(8, 1, PositionPreset::MidBand));
    let msg = random_message(36, 9);
    let result = embed(&cover, &msg, &config).unwrap();
    assert_eq!(extract(&result.stego, result.bit_length, &config).unwrap(), msg);
}

#[test]
fn dct_embed_never_returns_unreadable_image() {
    // Whatever the cover and step, an Ok result must decode; the only
    // acceptable failure is a reported saturated block.
    let covers = [
        Image::filled(16, 16, 3, 0),
        Image::filled(16, 16, 3, 255),
        textured_cover(16, 16, 2),
        checker_cover(16, 16),
    ];
    for cover in &covers {
        for q in [1u32, 2, 4, 70, 100] {
            for preset in [PositionPreset::Single, PositionPreset::MidBand, PositionPreset::Wide] {
                let config = EmbeddingConfig::Dct(DctConfig::new(8, q, preset));
                let cap = dct_capacity_bits(cover, 8, preset.positions().len());
                let mut rng = ChaCha20Rng::seed_from_u64(q as u64);
                let bits: Vec<u8> = (0..cap).map(|_| rng.gen_range(0..2u8)).collect();
                match embed_bits(cover, &bits, &config) {
                    Ok(result) => assert_eq!(
                        extract_bits(&result.stego, cap, &config).unwrap(),
                        bits,
                        "q={q} preset={preset:?}"
                    ),
                    Err(e) => assert!(matches!(e, StegoError::Unembeddable { .. }), "unexpected {e}"),
                }
            }
        }
    }
}

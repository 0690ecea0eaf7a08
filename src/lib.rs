// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # hybstego-core
//!
//! Raster-image steganography engine with built-in evaluation. Hides a byte
//! message in a decoded pixel array using one of three methods:
//!
//! - **LSB**: spatial bit-plane substitution (1–8 low bits per sample).
//! - **DCT**: parity quantization of mid-frequency coefficients in
//!   4/8/12/16-pixel blocks.
//! - **Hybrid**: an ordered split of the message, DCT first, then LSB on
//!   the result.
//!
//! The `metrics` module scores how visible the embedding is (MSE, PSNR,
//! SSIM) and how well it survives a fixed battery of 32 image attacks (BER).
//!
//! The core works on decoded pixels only; file decoding, UI and parameter
//! file storage belong to the host. The embedded bit length is returned out
//! of band and must be supplied again for extraction.
//!
//! # Quick start
//!
//! ```rust
//! use hybstego_core::{embed, extract, Image, EmbeddingConfig, LsbConfig};
//!
//! let cover = Image::filled(8, 8, 3, 0);
//! let config = EmbeddingConfig::Lsb(LsbConfig::new(1));
//! let result = embed(&cover, &[0x01], &config).unwrap();
//! let message = extract(&result.stego, result.bit_length, &config).unwrap();
//! assert_eq!(message, vec![0x01]);
//! ```

pub mod bits;
pub mod image;
pub mod metrics;
pub mod stego;

pub use bits::{bits_to_bytes, bytes_to_bits};
pub use image::Image;
pub use metrics::{compute_imperceptibility, compute_robustness, AttackOutcome, Imperceptibility};
pub use stego::{embed, embed_bits, extract, extract_bits, extract_with_record, EmbedResult, StegoError};
pub use stego::{DctConfig, EmbedPositions, EmbeddingConfig, HybridConfig, LsbConfig, ParameterRecord, PositionPreset};
pub use stego::capacity::{capacity_bits, dct_capacity_bits, hybrid_capacity_bits, lsb_capacity_bits};
pub use stego::payload::{generate_payload, generate_payload_bits};

// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Robustness battery: attack, re-extract, score.

use rayon::prelude::*;

use crate::image::Image;
use crate::metrics::attacks::Attack;
use crate::metrics::ber::bit_error_rate;
use crate::stego::error::StegoError;

/// Battery seed used by [`compute_robustness`](crate::metrics::compute_robustness).
pub const DEFAULT_ATTACK_SEED: u64 = 0x5EED_0000_0032;

/// BER measured after one attack.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackOutcome {
    pub attack: String,
    pub ber: f64,
}

/// Per-attack seed: independent of execution order.
fn attack_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Apply each attack to a fresh copy of `stego`, re-extract with `extract`
/// and compare against `original_bits`.
///
/// Attacks run in parallel; the result keeps the order of `attacks`.
///
/// # Errors
/// The first extraction error, or [`StegoError::LengthMismatch`] if
/// `extract` returns a different number of bits than `original_bits`.
pub fn run_robustness_battery<F>(
    stego: &Image,
    attacks: &[Attack],
    seed: u64,
    extract: F,
    original_bits: &[u8],
) -> Result<Vec<AttackOutcome>, StegoError>
where
    F: Fn(&Image) -> Result<Vec<u8>, StegoError> + Sync,
{
    attacks
        .par_iter()
        .enumerate()
        .map(|(i, attack)| {
            let attacked = attack.apply(stego, attack_seed(seed, i));
            let recovered = extract(&attacked)?;
            let ber = bit_error_rate(original_bits, &recovered)?;
            let name = attack.name();
            tracing::trace!(attack = %name, ber, "attack scored");
            Ok(AttackOutcome { attack: name, ber })
        })
        .collect()
}

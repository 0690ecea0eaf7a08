// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Parity quantization-index modulation of a single coefficient.
//!
//! A coefficient `c` is quantized to `q = round(c / step)`. The embedded bit
//! is the parity of `q`; when the parity is wrong, `q` moves one step toward
//! zero, or up from zero itself. The coefficient is then snapped to
//! `q * step`, so it moves by at most one and a half steps.

/// Quantization index of `coeff`.
pub fn quant_index(coeff: f64, step: f64) -> i64 {
    (coeff / step).round() as i64
}

/// Return the coefficient value carrying `bit` (0 or 1).
pub fn embed_bit(coeff: f64, bit: u8, step: f64) -> f64 {
    debug_assert!(step > 0.0);
    let mut q = quant_index(coeff, step);
    if q.rem_euclid(2) != (bit & 1) as i64 {
        q += parity_step(q);
    }
    q as f64 * step
}

/// Read the bit carried by `coeff`.
pub fn extract_bit(coeff: f64, step: f64) -> u8 {
    quant_index(coeff, step).rem_euclid(2) as u8
}

/// Direction (+1 or -1) of the parity fix for index `q`.
///
/// Increment unless that moves `q` further from zero than decrementing
/// would; at zero both are equally far, so increment.
fn parity_step(q: i64) -> i64 {
    if q > 0 {
        -1
    } else {
        1
    }
}

// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Bit error rate between an original and a recovered bit sequence.

use crate::stego::error::StegoError;

/// Fraction of positions where the two sequences differ.
///
/// Empty sequences have a BER of 0.
///
/// # Errors
/// [`StegoError::LengthMismatch`] if the lengths differ; sequences are never
/// silently truncated to a common prefix.
pub fn bit_error_rate(original: &[u8], recovered: &[u8]) -> Result<f64, StegoError> {
    if original.len() != recovered.len() {
        return Err(StegoError::LengthMismatch {
            left: original.len(),
            right: recovered.len(),
        });
    }
    if original.is_empty() {
        return Ok(0.0);
    }
    let errors = original
        .iter()
        .zip(recovered)
        .filter(|(&a, &b)| (a & 1) != (b & 1))
        .count();
    Ok(errors as f64 / original.len() as f64)
}

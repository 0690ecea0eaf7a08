// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Orthonormal N×N DCT-II and its inverse.
//!
//! Separable implementation over a precomputed cosine table. Blocks are
//! row-major `f64` slices of length `N * N`; coefficient `(v, u)` lives at
//! index `v * N + u` (vertical frequency first). No level shift is applied:
//! only AC terms are ever modified, and those are shift-invariant.

use std::f64::consts::PI;

/// Cosine and normalization tables for one block size.
#[derive(Debug, Clone)]
pub struct DctBasis {
    n: usize,
    /// `cos[u * n + x] = cos((2x + 1) * u * PI / 2n)`
    cos: Vec<f64>,
    /// `norm[0] = sqrt(1/n)`, `norm[u > 0] = sqrt(2/n)`
    norm: Vec<f64>,
}

impl DctBasis {
    pub fn new(n: usize) -> Self {
        let mut cos = vec![0.0f64; n * n];
        for u in 0..n {
            for x in 0..n {
                cos[u * n + x] = ((2 * x + 1) as f64 * u as f64 * PI / (2 * n) as f64).cos();
            }
        }
        let mut norm = vec![(2.0 / n as f64).sqrt(); n];
        if n > 0 {
            norm[0] = (1.0 / n as f64).sqrt();
        }
        Self { n, cos, norm }
    }

    /// Block edge length.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Change in coefficient `coeff` (index `v * n + u`) per unit change of
    /// the sample at `pixel` (index `y * n + x`).
    pub fn weight(&self, coeff: usize, pixel: usize) -> f64 {
        let n = self.n;
        let (v, u) = (coeff / n, coeff % n);
        let (y, x) = (pixel / n, pixel % n);
        self.norm[v] * self.norm[u] * self.cos[v * n + y] * self.cos[u * n + x]
    }

    /// Forward 2D DCT of an `n × n` pixel block.
    pub fn forward(&self, pixels: &[f64]) -> Vec<f64> {
        let n = self.n;
        debug_assert_eq!(pixels.len(), n * n);

        // Rows.
        let mut temp = vec![0.0f64; n * n];
        for row in 0..n {
            for u in 0..n {
                let mut sum = 0.0;
                for x in 0..n {
                    sum += pixels[row * n + x] * self.cos[u * n + x];
                }
                temp[row * n + u] = self.norm[u] * sum;
            }
        }

        // Columns.
        let mut coeffs = vec![0.0f64; n * n];
        for col in 0..n {
            for v in 0..n {
                let mut sum = 0.0;
                for y in 0..n {
                    sum += temp[y * n + col] * self.cos[v * n + y];
                }
                coeffs[v * n + col] = self.norm[v] * sum;
            }
        }
        coeffs
    }

    /// Inverse 2D DCT back to (unrounded) pixel values.
    pub fn inverse(&self, coeffs: &[f64]) -> Vec<f64> {
        let n = self.n;
        debug_assert_eq!(coeffs.len(), n * n);

        // Columns.
        let mut temp = vec![0.0f64; n * n];
        for col in 0..n {
            for y in 0..n {
                let mut sum = 0.0;
                for v in 0..n {
                    sum += self.norm[v] * coeffs[v * n + col] * self.cos[v * n + y];
                }
                temp[y * n + col] = sum;
            }
        }

        // Rows.
        let mut pixels = vec![0.0f64; n * n];
        for row in 0..n {
            for x in 0..n {
                let mut sum = 0.0;
                for u in 0..n {
                    sum += self.norm[u] * temp[row * n + u] * self.cos[u * n + x];
                }
                pixels[row * n + x] = sum;
            }
        }
        pixels
    }
}

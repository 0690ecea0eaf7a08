// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Full-reference image quality: MSE, PSNR and SSIM.

use crate::image::Image;
use crate::stego::error::StegoError;

/// Peak sample value for 8-bit images.
const PEAK: f64 = 255.0;

/// SSIM window edge length. Images smaller than this use one window
/// covering the whole channel.
pub const SSIM_WINDOW: usize = 8;

/// SSIM stabilizers: `C1 = (0.01 * L)^2`, `C2 = (0.03 * L)^2`.
const SSIM_C1: f64 = (0.01 * PEAK) * (0.01 * PEAK);
const SSIM_C2: f64 = (0.03 * PEAK) * (0.03 * PEAK);

/// Mean squared sample difference.
///
/// # Errors
/// [`StegoError::Shape`] if the images differ in shape.
pub fn mse(a: &Image, b: &Image) -> Result<f64, StegoError> {
    a.ensure_same_shape(b)?;
    if a.is_empty() {
        return Ok(0.0);
    }
    let sum: f64 = a
        .samples()
        .iter()
        .zip(b.samples())
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum();
    Ok(sum / a.len() as f64)
}

/// Peak signal-to-noise ratio in dB; `+inf` for identical images.
pub fn psnr(a: &Image, b: &Image) -> Result<f64, StegoError> {
    Ok(psnr_from_mse(mse(a, b)?))
}

/// `10 * log10(255^2 / mse)`, or `+inf` when `mse == 0`.
pub fn psnr_from_mse(mse: f64) -> f64 {
    if mse == 0.0 {
        return f64::INFINITY;
    }
    10.0 * (PEAK * PEAK / mse).log10()
}

/// Mean structural similarity.
///
/// Uses uniform `SSIM_WINDOW × SSIM_WINDOW` windows at every valid offset
/// (stride 1), averages per channel, then across channels.
pub fn ssim(a: &Image, b: &Image) -> Result<f64, StegoError> {
    a.ensure_same_shape(b)?;
    if a.is_empty() {
        return Ok(1.0);
    }
    let total: f64 = (0..a.channels())
        .map(|ch| channel_ssim(&a.channel_plane(ch), &b.channel_plane(ch), a.rows(), a.cols()))
        .sum();
    Ok(total / a.channels() as f64)
}

/// Summed-area table with a zero first row/column: `(h + 1) × (w + 1)`.
struct Integral {
    w1: usize,
    sums: Vec<f64>,
}

impl Integral {
    fn new(values: impl Iterator<Item = f64>, w: usize, h: usize) -> Self {
        let w1 = w + 1;
        let mut sums = vec![0.0f64; w1 * (h + 1)];
        let mut values = values;
        for y in 0..h {
            let mut row = 0.0;
            for x in 0..w {
                row += values.next().unwrap_or(0.0);
                sums[(y + 1) * w1 + x + 1] = sums[y * w1 + x + 1] + row;
            }
        }
        Self { w1, sums }
    }

    /// Sum over the window with top-left `(y, x)` and edge `win`.
    fn window(&self, y: usize, x: usize, win_h: usize, win_w: usize) -> f64 {
        let (y1, x1) = (y + win_h, x + win_w);
        self.sums[y1 * self.w1 + x1] - self.sums[y * self.w1 + x1] - self.sums[y1 * self.w1 + x]
            + self.sums[y * self.w1 + x]
    }
}

fn channel_ssim(a: &[f64], b: &[f64], rows: usize, cols: usize) -> f64 {
    let win_h = SSIM_WINDOW.min(rows);
    let win_w = SSIM_WINDOW.min(cols);
    let n = (win_h * win_w) as f64;

    let sa = Integral::new(a.iter().copied(), cols, rows);
    let sb = Integral::new(b.iter().copied(), cols, rows);
    let saa = Integral::new(a.iter().map(|v| v * v), cols, rows);
    let sbb = Integral::new(b.iter().map(|v| v * v), cols, rows);
    let sab = Integral::new(a.iter().zip(b).map(|(x, y)| x * y), cols, rows);

    let mut total = 0.0;
    let mut count = 0usize;
    for y in 0..=rows - win_h {
        for x in 0..=cols - win_w {
            let mu_a = sa.window(y, x, win_h, win_w) / n;
            let mu_b = sb.window(y, x, win_h, win_w) / n;
            let var_a = saa.window(y, x, win_h, win_w) / n - mu_a * mu_a;
            let var_b = sbb.window(y, x, win_h, win_w) / n - mu_b * mu_b;
            let cov = sab.window(y, x, win_h, win_w) / n - mu_a * mu_b;

            let num = (2.0 * mu_a * mu_b + SSIM_C1) * (2.0 * cov + SSIM_C2);
            let den = (mu_a * mu_a + mu_b * mu_b + SSIM_C1) * (var_a + var_b + SSIM_C2);
            total += num / den;
            count += 1;
        }
    }
    total / count as f64
}

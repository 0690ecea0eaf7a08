// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Image attacks for the robustness battery.
//!
//! Every attack keeps the image shape, so the same extraction config stays
//! valid afterwards. Randomized attacks draw from a `ChaCha20Rng` seeded by
//! the caller, which makes each run reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::image::{clamp_sample, Image};
use crate::stego::dct::transform::DctBasis;

/// Number of attacks in [`standard_attacks`].
pub const ATTACK_COUNT: usize = 32;

/// IJG baseline luminance quantization table (quality 50), row-major.
const LUMA_QUANT: [u16; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61,
    12, 12, 14, 19, 26, 58, 60, 55,
    14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62,
    18, 22, 37, 56, 68, 109, 103, 77,
    24, 35, 55, 64, 81, 104, 113, 92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103, 99,
];

/// Fill value for samples rotated in from outside the frame.
const ROTATE_FILL: f64 = 128.0;

/// A shape-preserving image transformation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Attack {
    /// Additive zero-mean Gaussian noise with standard deviation `sigma`.
    GaussianNoise { sigma: f64 },
    /// Each pixel becomes black or white with probability `density`.
    SaltPepper { density: f64 },
    /// 8×8 DCT quantization with the IJG table scaled to `quality` (1–100).
    Recompress { quality: u8 },
    /// Blank out a border totalling `fraction` of each dimension.
    Crop { fraction: f64 },
    /// Rotate about the image centre with bilinear sampling.
    Rotate { degrees: f64 },
    Brightness { offset: i16 },
    /// Scale deviations from mid-grey by `factor`.
    Contrast { factor: f64 },
    Gamma { gamma: f64 },
    MeanBlur,
    Median,
    GaussianBlur,
    Sharpen,
    /// Bilinear downscale by `factor`, then back to the original size.
    Rescale { factor: f64 },
}

impl Attack {
    /// Stable identifier used in robustness reports.
    pub fn name(&self) -> String {
        match *self {
            Self::GaussianNoise { sigma } => format!("gaussian_noise_sigma{sigma}"),
            Self::SaltPepper { density } => format!("salt_pepper_{density}"),
            Self::Recompress { quality } => format!("recompress_q{quality}"),
            Self::Crop { fraction } => format!("crop_{}pct", (fraction * 100.0).round()),
            Self::Rotate { degrees } => format!("rotate_{degrees}deg"),
            Self::Brightness { offset } => format!("brightness_{offset:+}"),
            Self::Contrast { factor } => format!("contrast_x{factor}"),
            Self::Gamma { gamma } => format!("gamma_{gamma}"),
            Self::MeanBlur => "mean_blur_3x3".into(),
            Self::Median => "median_3x3".into(),
            Self::GaussianBlur => "gaussian_blur_3x3".into(),
            Self::Sharpen => "sharpen_3x3".into(),
            Self::Rescale { factor } => format!("rescale_x{factor}"),
        }
    }

    /// Apply the attack to a copy of `img`. `seed` only matters for the
    /// noise attacks.
    pub fn apply(&self, img: &Image, seed: u64) -> Image {
        match *self {
            Self::GaussianNoise { sigma } => gaussian_noise(img, sigma, seed),
            Self::SaltPepper { density } => salt_pepper(img, density, seed),
            Self::Recompress { quality } => recompress(img, quality),
            Self::Crop { fraction } => crop_border(img, fraction),
            Self::Rotate { degrees } => map_planes(img, |p, w, h| rotate_plane(p, w, h, degrees.to_radians())),
            Self::Brightness { offset } => map_samples(img, |v| v + offset as f64),
            Self::Contrast { factor } => map_samples(img, |v| (v - 128.0) * factor + 128.0),
            Self::Gamma { gamma } => map_samples(img, |v| 255.0 * (v / 255.0).powf(gamma)),
            Self::MeanBlur => convolve3(img, &[1.0; 9], 9.0),
            Self::Median => median3(img),
            Self::GaussianBlur => convolve3(img, &[1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0], 16.0),
            Self::Sharpen => convolve3(img, &[0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0], 1.0),
            Self::Rescale { factor } => map_planes(img, |p, w, h| rescale_plane(p, w, h, factor)),
        }
    }
}

/// The fixed, ordered 32-attack robustness battery.
pub fn standard_attacks() -> Vec<Attack> {
    let mut attacks = Vec::with_capacity(ATTACK_COUNT);
    attacks.extend([1.0, 2.0, 5.0, 10.0].map(|sigma| Attack::GaussianNoise { sigma }));
    attacks.extend([0.001, 0.005, 0.01, 0.05].map(|density| Attack::SaltPepper { density }));
    attacks.extend([90, 75, 50, 25].map(|quality| Attack::Recompress { quality }));
    attacks.extend([0.05, 0.10, 0.20, 0.25].map(|fraction| Attack::Crop { fraction }));
    attacks.extend([1.0, 2.0, 5.0, 10.0].map(|degrees| Attack::Rotate { degrees }));
    attacks.extend([10, -10].map(|offset| Attack::Brightness { offset }));
    attacks.extend([0.9, 1.1].map(|factor| Attack::Contrast { factor }));
    attacks.extend([0.8, 1.2].map(|gamma| Attack::Gamma { gamma }));
    attacks.extend([Attack::MeanBlur, Attack::Median, Attack::GaussianBlur, Attack::Sharpen]);
    attacks.extend([0.5, 0.75].map(|factor| Attack::Rescale { factor }));
    debug_assert_eq!(attacks.len(), ATTACK_COUNT);
    attacks
}

fn map_samples(img: &Image, f: impl Fn(f64) -> f64) -> Image {
    let mut out = img.clone();
    for v in out.samples_mut() {
        *v = clamp_sample(f(*v as f64));
    }
    out
}

/// Run a plane-to-plane transform on every channel.
fn map_planes(img: &Image, f: impl Fn(&[f64], usize, usize) -> Vec<f64>) -> Image {
    let mut out = img.clone();
    for ch in 0..img.channels() {
        let plane = f(&img.channel_plane(ch), img.cols(), img.rows());
        out.set_channel_plane(ch, &plane);
    }
    out
}

/// Standard normal sample via Box-Muller.
fn standard_normal(rng: &mut ChaCha20Rng) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

fn gaussian_noise(img: &Image, sigma: f64, seed: u64) -> Image {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut out = img.clone();
    for v in out.samples_mut() {
        *v = clamp_sample(*v as f64 + sigma * standard_normal(&mut rng));
    }
    out
}

fn salt_pepper(img: &Image, density: f64, seed: u64) -> Image {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut out = img.clone();
    let channels = img.channels();
    for pixel in out.samples_mut().chunks_mut(channels) {
        if rng.gen::<f64>() < density {
            let value = if rng.gen::<bool>() { 255 } else { 0 };
            pixel.fill(value);
        }
    }
    out
}

/// IJG quality scaling of the baseline table.
fn quant_table(quality: u8) -> [f64; 64] {
    let q = quality.clamp(1, 100) as u32;
    let scale = if q < 50 { 5000 / q } else { 200 - 2 * q };
    let mut table = [1.0f64; 64];
    for (t, &base) in table.iter_mut().zip(LUMA_QUANT.iter()) {
        *t = ((base as u32 * scale + 50) / 100).clamp(1, 255) as f64;
    }
    table
}

fn recompress(img: &Image, quality: u8) -> Image {
    const N: usize = 8;
    let basis = DctBasis::new(N);
    let table = quant_table(quality);
    map_planes(img, |plane, w, h| {
        let mut out = plane.to_vec();
        for by in (0..h).step_by(N) {
            for bx in (0..w).step_by(N) {
                // Edge blocks are padded by replicating the last row/column.
                let mut block = [0.0f64; N * N];
                for y in 0..N {
                    for x in 0..N {
                        let sy = (by + y).min(h - 1);
                        let sx = (bx + x).min(w - 1);
                        block[y * N + x] = plane[sy * w + sx] - 128.0;
                    }
                }
                let mut coeffs = basis.forward(&block);
                for (c, &t) in coeffs.iter_mut().zip(table.iter()) {
                    *c = (*c / t).round() * t;
                }
                let pixels = basis.inverse(&coeffs);
                for y in 0..N.min(h - by) {
                    for x in 0..N.min(w - bx) {
                        out[(by + y) * w + bx + x] = pixels[y * N + x] + 128.0;
                    }
                }
            }
        }
        out
    })
}

fn crop_border(img: &Image, fraction: f64) -> Image {
    let top = (img.rows() as f64 * fraction / 2.0).round() as usize;
    let left = (img.cols() as f64 * fraction / 2.0).round() as usize;
    let bottom = img.rows().saturating_sub(top);
    let right = img.cols().saturating_sub(left);
    Image::from_fn(img.rows(), img.cols(), img.channels(), |r, c, ch| {
        if r >= top && r < bottom && c >= left && c < right {
            img.get(r, c, ch)
        } else {
            0
        }
    })
}

/// Sample with bilinear interpolation; `fill` outside the frame.
fn bilinear_sample(plane: &[f64], w: usize, h: usize, x: f64, y: f64, fill: f64) -> f64 {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let get = |px: i64, py: i64| -> f64 {
        if px >= 0 && px < w as i64 && py >= 0 && py < h as i64 {
            plane[py as usize * w + px as usize]
        } else {
            fill
        }
    };

    let top = get(x0, y0) * (1.0 - fx) + get(x0 + 1, y0) * fx;
    let bottom = get(x0, y0 + 1) * (1.0 - fx) + get(x0 + 1, y0 + 1) * fx;
    top * (1.0 - fy) + bottom * fy
}

/// Rotate by `theta` radians about the centre, inverse-mapping each output
/// pixel to its source position.
fn rotate_plane(plane: &[f64], w: usize, h: usize, theta: f64) -> Vec<f64> {
    let (sin_t, cos_t) = theta.sin_cos();
    let cx = (w as f64 - 1.0) / 2.0;
    let cy = (h as f64 - 1.0) / 2.0;
    let mut out = vec![ROTATE_FILL; w * h];
    for dy in 0..h {
        for dx in 0..w {
            let x = dx as f64 - cx;
            let y = dy as f64 - cy;
            let sx = x * cos_t + y * sin_t + cx;
            let sy = -x * sin_t + y * cos_t + cy;
            out[dy * w + dx] = bilinear_sample(plane, w, h, sx, sy, ROTATE_FILL);
        }
    }
    out
}

/// Bilinear resize with pixel-centre alignment and edge clamping.
fn resize_plane(plane: &[f64], w: usize, h: usize, new_w: usize, new_h: usize) -> Vec<f64> {
    let sx = w as f64 / new_w as f64;
    let sy = h as f64 / new_h as f64;
    let mut out = vec![0.0f64; new_w * new_h];
    for y in 0..new_h {
        let src_y = ((y as f64 + 0.5) * sy - 0.5).clamp(0.0, (h - 1) as f64);
        for x in 0..new_w {
            let src_x = ((x as f64 + 0.5) * sx - 0.5).clamp(0.0, (w - 1) as f64);
            out[y * new_w + x] = bilinear_sample(plane, w, h, src_x, src_y, plane[src_y as usize * w + src_x as usize]);
        }
    }
    out
}

fn rescale_plane(plane: &[f64], w: usize, h: usize, factor: f64) -> Vec<f64> {
    if w == 0 || h == 0 {
        return plane.to_vec();
    }
    let small_w = ((w as f64 * factor).round() as usize).max(1);
    let small_h = ((h as f64 * factor).round() as usize).max(1);
    let small = resize_plane(plane, w, h, small_w, small_h);
    resize_plane(&small, small_w, small_h, w, h)
}

/// 3×3 neighbourhood of `(r, c)` in one channel, edges replicated.
fn neighbourhood(img: &Image, r: usize, c: usize, ch: usize) -> [f64; 9] {
    let mut out = [0.0f64; 9];
    let max_r = img.rows() - 1;
    let max_c = img.cols() - 1;
    for dy in 0..3 {
        for dx in 0..3 {
            let y = (r + dy).saturating_sub(1).min(max_r);
            let x = (c + dx).saturating_sub(1).min(max_c);
            out[dy * 3 + dx] = img.get(y, x, ch) as f64;
        }
    }
    out
}

fn convolve3(img: &Image, kernel: &[f64; 9], divisor: f64) -> Image {
    if img.is_empty() {
        return img.clone();
    }
    Image::from_fn(img.rows(), img.cols(), img.channels(), |r, c, ch| {
        let window = neighbourhood(img, r, c, ch);
        let sum: f64 = window.iter().zip(kernel).map(|(v, k)| v * k).sum();
        clamp_sample(sum / divisor)
    })
}

fn median3(img: &Image) -> Image {
    if img.is_empty() {
        return img.clone();
    }
    Image::from_fn(img.rows(), img.cols(), img.channels(), |r, c, ch| {
        let mut window = neighbourhood(img, r, c, ch);
        window.sort_unstable_by(f64::total_cmp);
        window[4] as u8
    })
}

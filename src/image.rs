// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Decoded raster image storage.
//!
//! [`Image`] holds 8-bit samples in a flat buffer indexed by
//! `(row, col, channel)`, row-major with interleaved channels. Every engine
//! reads a borrowed cover and produces a fresh `Image`; nothing is mutated
//! in place across calls.

use crate::stego::error::StegoError;

/// An 8-bit raster image: `rows × cols × channels` samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    rows: usize,
    cols: usize,
    channels: usize,
    /// Flat storage: `(row * cols + col) * channels + channel`.
    data: Vec<u8>,
}

impl Image {
    /// Create an image with every sample set to `value`.
    ///
    /// # Panics
    /// If `channels == 0`; use [`Image::from_raw`] for unchecked input.
    pub fn filled(rows: usize, cols: usize, channels: usize, value: u8) -> Self {
        assert!(channels > 0, "image must have at least one channel");
        Self {
            rows,
            cols,
            channels,
            data: vec![value; rows * cols * channels],
        }
    }

    /// Wrap an existing interleaved sample buffer.
    ///
    /// # Errors
    /// [`StegoError::InvalidImage`] if `data.len() != rows * cols * channels`
    /// or `channels == 0`.
    pub fn from_raw(rows: usize, cols: usize, channels: usize, data: Vec<u8>) -> Result<Self, StegoError> {
        if channels == 0 {
            return Err(StegoError::InvalidImage("image must have at least one channel"));
        }
        let expected = rows
            .checked_mul(cols)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(StegoError::InvalidImage("image dimensions overflow"))?;
        if data.len() != expected {
            return Err(StegoError::InvalidImage("sample buffer length does not match rows × cols × channels"));
        }
        Ok(Self { rows, cols, channels, data })
    }

    /// Build an image from a sample function evaluated in raster order.
    ///
    /// # Panics
    /// If `channels == 0`.
    pub fn from_fn(rows: usize, cols: usize, channels: usize, mut f: impl FnMut(usize, usize, usize) -> u8) -> Self {
        assert!(channels > 0, "image must have at least one channel");
        let mut data = Vec::with_capacity(rows * cols * channels);
        for r in 0..rows {
            for c in 0..cols {
                for ch in 0..channels {
                    data.push(f(r, c, ch));
                }
            }
        }
        Self { rows, cols, channels, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `(rows, cols, channels)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.rows, self.cols, self.channels)
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a sample value.
    ///
    /// # Panics
    /// If any coordinate is out of bounds.
    pub fn get(&self, row: usize, col: usize, channel: usize) -> u8 {
        self.data[self.index(row, col, channel)]
    }

    /// Set a sample value.
    ///
    /// # Panics
    /// If any coordinate is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, channel: usize, value: u8) {
        let idx = self.index(row, col, channel);
        self.data[idx] = value;
    }

    /// Raw samples in raster order (rows, then columns, then channels).
    pub fn samples(&self) -> &[u8] {
        &self.data
    }

    /// Raw mutable samples in raster order.
    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Copy one channel out as a row-major `f64` plane.
    pub fn channel_plane(&self, channel: usize) -> Vec<f64> {
        self.data
            .iter()
            .skip(channel)
            .step_by(self.channels)
            .map(|&v| v as f64)
            .collect()
    }

    /// Write a row-major `f64` plane back into one channel, rounding to the
    /// nearest integer and clamping to `[0, 255]`.
    pub fn set_channel_plane(&mut self, channel: usize, plane: &[f64]) {
        debug_assert_eq!(plane.len(), self.rows * self.cols);
        for (i, &v) in plane.iter().enumerate() {
            self.data[i * self.channels + channel] = clamp_sample(v);
        }
    }

    /// Fail with [`StegoError::Shape`] unless `other` has the same shape.
    pub fn ensure_same_shape(&self, other: &Image) -> Result<(), StegoError> {
        if self.shape() != other.shape() {
            return Err(StegoError::Shape {
                expected: self.shape(),
                found: other.shape(),
            });
        }
        Ok(())
    }

    fn index(&self, row: usize, col: usize, channel: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols && channel < self.channels,
            "sample ({row}, {col}, {channel}) outside {}x{}x{}",
            self.rows,
            self.cols,
            self.channels
        );
        (row * self.cols + col) * self.channels + channel
    }
}

/// Round to nearest and clamp into the 8-bit sample range.
pub fn clamp_sample(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_raster_layout() {
        let mut img = Image::filled(2, 3, 3, 0);
        assert_eq!(img.shape(), (2, 3, 3));
        assert_eq!(img.len(), 18);

        img.set(1, 2, 1, 200);
        assert_eq!(img.get(1, 2, 1), 200);
        // (1 * 3 + 2) * 3 + 1
        assert_eq!(img.samples()[16], 200);
        assert_eq!(img.get(1, 2, 0), 0);
    }

    #[test]
    fn from_raw_rejects_wrong_length() {
        assert!(Image::from_raw(2, 2, 3, vec![0; 12]).is_ok());
        assert!(matches!(
            Image::from_raw(2, 2, 3, vec![0; 11]),
            Err(StegoError::InvalidImage(_))
        ));
        assert!(Image::from_raw(2, 2, 0, vec![]).is_err());
    }

    #[test]
    #[should_panic(expected = "at least one channel")]
    fn filled_rejects_zero_channels() {
        let _ = Image::filled(4, 4, 0, 0);
    }

    #[test]
    #[should_panic(expected = "at least one channel")]
    fn from_fn_rejects_zero_channels() {
        let _ = Image::from_fn(4, 4, 0, |_, _, _| 0);
    }

    #[test]
    #[should_panic(expected = "outside 2x3x1")]
    fn get_past_last_column_panics() {
        // (0, 3) would alias (1, 0) without a bounds check.
        let img = Image::from_fn(2, 3, 1, |r, c, _| (r * 3 + c) as u8);
        let _ = img.get(0, 3, 0);
    }

    #[test]
    #[should_panic(expected = "outside 2x2x3")]
    fn set_bad_channel_panics() {
        let mut img = Image::filled(2, 2, 3, 0);
        img.set(0, 0, 3, 1);
    }

    #[test]
    fn channel_plane_roundtrip() {
        let img = Image::from_fn(4, 4, 3, |r, c, ch| (r * 16 + c * 4 + ch) as u8);
        let plane = img.channel_plane(2);
        assert_eq!(plane.len(), 16);
        assert_eq!(plane[5], img.get(1, 1, 2) as f64);

        let mut copy = Image::filled(4, 4, 3, 0);
        copy.set_channel_plane(2, &plane);
        assert_eq!(copy.get(3, 3, 2), img.get(3, 3, 2));
        assert_eq!(copy.get(3, 3, 1), 0);
    }

    #[test]
    fn clamp_sample_rounds_and_saturates() {
        assert_eq!(clamp_sample(-3.2), 0);
        assert_eq!(clamp_sample(12.5), 13);
        assert_eq!(clamp_sample(254.4), 254);
        assert_eq!(clamp_sample(300.0), 255);
    }
}

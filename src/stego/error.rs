// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for the embedding engines and metrics.
//!
//! [`StegoError`] covers every usage error the core surfaces: a message that
//! does not fit (or a block that saturates), an out-of-range parameter,
//! mismatched image shapes and misaligned or mismatched bit sequences. None of them are retried
//! internally.

use core::fmt;

/// Errors that can occur during embedding, extraction or evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum StegoError {
    /// The message needs more carrier bits than the cover provides.
    Capacity { needed: usize, available: usize },
    /// A configuration value is missing or out of range.
    Config(String),
    /// Two images that must match in shape do not.
    Shape {
        expected: (usize, usize, usize),
        found: (usize, usize, usize),
    },
    /// A bit sequence is not byte-aligned.
    NotByteAligned(usize),
    /// Two bit sequences that must have equal length do not.
    LengthMismatch { left: usize, right: usize },
    /// A DCT block cannot keep its coefficient parities once rounded and
    /// clamped to 8-bit samples.
    Unembeddable { channel: usize, block: usize },
    /// A sample buffer does not describe a valid image.
    InvalidImage(&'static str),
    /// A persisted parameter record could not be parsed.
    InvalidParams(String),
}

impl StegoError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for the length family (`NotByteAligned`, `LengthMismatch`).
    pub fn is_length_error(&self) -> bool {
        matches!(self, Self::NotByteAligned(_) | Self::LengthMismatch { .. })
    }
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capacity { needed, available } => {
                write!(f, "message needs {needed} bits but the cover holds only {available}")
            }
            Self::Config(msg) => write!(f, "invalid configuration: {msg}"),
            Self::Shape { expected, found } => write!(
                f,
                "image shape mismatch: expected {}x{}x{}, found {}x{}x{}",
                expected.0, expected.1, expected.2, found.0, found.1, found.2
            ),
            Self::NotByteAligned(len) => write!(f, "bit sequence of length {len} is not a multiple of 8"),
            Self::LengthMismatch { left, right } => {
                write!(f, "bit sequence lengths differ: {left} vs {right}")
            }
            Self::Unembeddable { channel, block } => {
                write!(f, "block {block} of channel {channel} cannot hold its bits in 8-bit samples")
            }
            Self::InvalidImage(msg) => write!(f, "invalid image: {msg}"),
            Self::InvalidParams(msg) => write!(f, "invalid parameter record: {msg}"),
        }
    }
}

impl std::error::Error for StegoError {}

impl From<serde_json::Error> for StegoError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidParams(e.to_string())
    }
}

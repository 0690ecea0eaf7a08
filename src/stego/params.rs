// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Persisted parameter record.
//!
//! The bit length is not stored in the image, so embed hands the caller a
//! [`ParameterRecord`] that extract needs back verbatim. The JSON form
//! flattens the engine config next to the bit length:
//!
//! ```text
//! {"method":"LSB","bit_plane":1,"message_bit_length":96}
//! ```

use serde::{Deserialize, Serialize};

use crate::stego::config::EmbeddingConfig;
use crate::stego::error::StegoError;

/// Method, engine settings and embedded bit length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    #[serde(flatten)]
    pub config: EmbeddingConfig,
    pub message_bit_length: usize,
}

impl ParameterRecord {
    pub fn new(config: EmbeddingConfig, message_bit_length: usize) -> Self {
        Self { config, message_bit_length }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, StegoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a record.
    ///
    /// # Errors
    /// - [`StegoError::InvalidParams`] for malformed JSON or missing fields.
    /// - [`StegoError::Config`] if the settings are out of range.
    pub fn from_json(json: &str) -> Result<Self, StegoError> {
        let record: Self = serde_json::from_str(json)?;
        record.config.validate()?;
        Ok(record)
    }
}

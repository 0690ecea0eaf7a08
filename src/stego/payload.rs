// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Deterministic filler messages for capacity testing.
//!
//! [`generate_payload`] shapes a base message to an exact UTF-8 byte size:
//! too-long input is cut at the last whole character that fits, and the
//! remainder is filled by cycling through [`CHARACTER_POOL`]. The output
//! depends only on the arguments.

/// Padding alphabet: ASCII letters, digits, then punctuation.
pub const CHARACTER_POOL: &str = concat!(
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "0123456789",
    "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~",
);

/// Base text for generated payloads, mixing ASCII with multi-byte characters.
pub const DEFAULT_MESSAGE: &str = concat!(
    "This message uses deterministic padding. 🚀 ",
    "The padding is a repeating, non-random sequence. ",
    "Let's test it: 123!@#<>? éçñ. 😊👍",
);

/// Default payload size in bits.
pub const DEFAULT_TARGET_BIT_SIZE: usize = 512;

/// Produce a string of exactly `target_byte_size` UTF-8 bytes.
///
/// If `base_message` is longer, it is truncated and any character that
/// would be split is dropped; the gap is then padded like any short input.
pub fn generate_payload(base_message: &str, target_byte_size: usize) -> String {
    let mut out = if base_message.len() > target_byte_size {
        let mut end = target_byte_size;
        while !base_message.is_char_boundary(end) {
            end -= 1;
        }
        tracing::warn!(
            original = base_message.len(),
            kept = end,
            target = target_byte_size,
            "base message truncated"
        );
        String::from(&base_message[..end])
    } else {
        String::from(base_message)
    };

    let padding = target_byte_size - out.len();
    out.reserve(padding);
    out.extend(CHARACTER_POOL.chars().cycle().take(padding));
    out
}

/// [`generate_payload`] sized in bits; partial bytes are dropped.
pub fn generate_payload_bits(base_message: &str, target_bit_size: usize) -> String {
    generate_payload(base_message, target_bit_size / 8)
}

/// [`DEFAULT_MESSAGE`] shaped to [`DEFAULT_TARGET_BIT_SIZE`].
pub fn default_payload() -> String {
    generate_payload_bits(DEFAULT_MESSAGE, DEFAULT_TARGET_BIT_SIZE)
}

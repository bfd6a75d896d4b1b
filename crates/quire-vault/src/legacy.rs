// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! First-generation obfuscation: UTF-16 XOR against the fingerprint, then base64.
//!
//! Kept only so the migration pipeline can read old values. Nothing in the
//! credential store writes this format.

use base64::Engine;
use base64::alphabet;
use base64::engine::DecodePaddingMode;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};

/// Old values were written by a lax encoder; accept them with or without padding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode a value the way the first-generation writer did.
///
/// Each XOR'd UTF-16 unit becomes one byte. Returns `None` when a unit does not
/// fit in a byte (the old writer failed there too) or the key is empty.
pub fn legacy_encode(plaintext: &str, key: &str) -> Option<String> {
    let key: Vec<u16> = key.encode_utf16().collect();
    if key.is_empty() {
        return None;
    }

    let bytes = plaintext
        .encode_utf16()
        .zip(key.iter().cycle())
        .map(|(unit, k)| u8::try_from(unit ^ k).ok())
        .collect::<Option<Vec<u8>>>()?;

    Some(LENIENT.encode(bytes))
}

/// Best-effort decode. Malformed base64, an empty key or a result that is not
/// valid UTF-16 all give `None`.
///
/// A successful decode says nothing about whether the key was right; callers
/// must check the shape of the result.
pub fn legacy_decode(encoded: &str, key: &str) -> Option<String> {
    let key: Vec<u16> = key.encode_utf16().collect();
    if key.is_empty() {
        return None;
    }

    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = LENIENT.decode(compact).ok()?;

    let units: Vec<u16> = bytes
        .iter()
        .zip(key.iter().cycle())
        .map(|(byte, k)| u16::from(*byte) ^ k)
        .collect();

    String::from_utf16(&units).ok()
}

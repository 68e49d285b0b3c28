//! Base64url codec for JWK integer fields (RFC 7515 §2, RFC 7518 §6.2)
//!
//! Encoding never emits padding. Decoding strips any trailing `=` first,
//! since some producers pad their coordinates anyway.

use crate::error::{JwkError, JwkResult};
use base64::{
    Engine as _, alphabet,
    engine::{GeneralPurpose, general_purpose},
};

/// URL-safe alphabet, no padding, unused trailing bits tolerated on input
const JWK_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    general_purpose::NO_PAD.with_decode_allow_trailing_bits(true),
);

/// Encode bytes as unpadded base64url
#[inline]
#[must_use]
pub fn encode(input: &[u8]) -> String {
    JWK_ENGINE.encode(input)
}

/// Decode base64url, tolerating trailing `=` padding.
///
/// # Errors
///
/// Returns [`JwkError::MalformedEncoding`] for characters outside the
/// base64url alphabet, padding anywhere but the end, or a truncated group.
#[inline]
pub fn decode(input: &str) -> JwkResult<Vec<u8>> {
    decode_field("value", input)
}

/// Decode a named field, attributing any failure to that field.
pub(crate) fn decode_field(field: &'static str, input: &str) -> JwkResult<Vec<u8>> {
    JWK_ENGINE
        .decode(input.trim_end_matches('='))
        .map_err(|e| JwkError::malformed_encoding(field, &e.to_string()))
}

/// Encode an unsigned big-endian integer with leading zero bytes omitted.
///
/// Zero encodes as a single `0x00` byte so the field is never empty.
#[must_use]
pub fn encode_uint(be_bytes: &[u8]) -> String {
    let first = be_bytes
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(be_bytes.len().saturating_sub(1));
    encode(&be_bytes[first..])
}

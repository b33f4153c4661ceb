//! String encodings and compact digests for identifiers.
//!
//! Two encodings are used at the boundaries:
//!
//! - **Human-readable**: bech32 (`prefix1...` with a checksum), for identifiers
//!   that users copy around, such as public keys and resource ids.
//! - **Compact**: URL-safe base64 without padding, for storage paths and
//!   configuration values.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use bech32::{FromBase32, ToBase32, Variant};

use crate::error::CoreError;

/// Length of [`digest_compact`] output in bytes.
pub const COMPACT_DIGEST_LEN: usize = 16;

/// Encode bytes as bech32 with the given human-readable prefix.
pub fn stringify_human_readable(prefix: &str, bytes: &[u8]) -> Result<String, CoreError> {
    bech32::encode(prefix, bytes.to_base32(), Variant::Bech32)
        .map_err(|e| CoreError::InvalidHumanReadable(e.to_string()))
}

/// Decode a bech32 string, requiring the given prefix.
pub fn parse_human_readable(s: &str, expected_prefix: &str) -> Result<Vec<u8>, CoreError> {
    let (prefix, data, variant) =
        bech32::decode(s).map_err(|e| CoreError::InvalidHumanReadable(e.to_string()))?;

    if prefix != expected_prefix {
        return Err(CoreError::InvalidHumanReadable(format!(
            "unexpected prefix {prefix}, expected {expected_prefix}"
        )));
    }
    if variant != Variant::Bech32 {
        return Err(CoreError::InvalidHumanReadable("expected bech32 variant".into()));
    }

    Vec::<u8>::from_base32(&data).map_err(|e| CoreError::InvalidHumanReadable(e.to_string()))
}

/// Encode bytes as URL-safe base64 without padding.
pub fn stringify_compact(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode URL-safe base64 without padding.
pub fn parse_compact(s: &str) -> Result<Vec<u8>, CoreError> {
    URL_SAFE_NO_PAD
        .decode(s)
        .map_err(|e| CoreError::InvalidCompact(e.to_string()))
}

/// A short (128-bit) digest for compact identifiers.
///
/// This is the Blake3 output truncated to [`COMPACT_DIGEST_LEN`] bytes.
pub fn digest_compact(bytes: &[u8]) -> [u8; COMPACT_DIGEST_LEN] {
    let hash = blake3::hash(bytes);
    let mut out = [0u8; COMPACT_DIGEST_LEN];
    out.copy_from_slice(&hash.as_bytes()[..COMPACT_DIGEST_LEN]);
    out
}

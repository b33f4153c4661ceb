//! Public keys for permission actions.
//!
//! Wraps ed25519-dalek keys with strong types and the human-readable
//! encoding used for user-facing identifiers.

use ed25519_dalek::{SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bytes::{parse_human_readable, stringify_human_readable};
use crate::error::CoreError;

/// Human-readable prefix of [`PubKey`] strings.
pub const PUBKEY_PREFIX: &str = "owspk";

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PubKey(#[serde(with = "serde_bytes")] pub [u8; 32]);

impl PubKey {
    /// Create from raw bytes, checking that they are a valid curve point.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CoreError> {
        VerifyingKey::from_bytes(&bytes)
            .map_err(|_| CoreError::DecodingError("invalid ed25519 public key".into()))?;
        Ok(Self(bytes))
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Checksummed human-readable rendering (`owspk1...`).
    pub fn to_human_readable(&self) -> String {
        stringify_human_readable(PUBKEY_PREFIX, &self.0).unwrap_or_default()
    }

    /// Parse a human-readable public key.
    pub fn parse_human_readable(s: &str) -> Result<Self, CoreError> {
        let bytes = parse_human_readable(s, PUBKEY_PREFIX)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CoreError::InvalidHumanReadable("public key must be 32 bytes".into()))?;
        Self::from_bytes(arr)
    }
}

impl fmt::Debug for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PubKey({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_human_readable())
    }
}

impl AsRef<[u8]> for PubKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A signing keypair.
///
/// This wraps ed25519-dalek's SigningKey.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Get the public key.
    pub fn public_key(&self) -> PubKey {
        PubKey(self.signing_key.verifying_key().to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.public_key())
    }
}

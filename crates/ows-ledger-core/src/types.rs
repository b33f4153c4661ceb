//! Strong type definitions for the ledger.
//!
//! All identifiers are newtypes to prevent misuse at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bytes::{
    digest_compact, parse_human_readable, stringify_compact, stringify_human_readable,
    COMPACT_DIGEST_LEN,
};
use crate::error::CoreError;

/// A 32-byte change set hash, computed as Blake3(canonical encoding).
///
/// This is the content-address of a change set. The genesis change set
/// links to [`ChangeSetHash::ZERO`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChangeSetHash(#[serde(with = "serde_bytes")] pub [u8; 32]);

impl ChangeSetHash {
    /// Compute the hash of the given bytes.
    pub fn digest(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Create a new hash from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Compact (URL-safe base64) rendering, used for storage paths.
    pub fn to_compact(&self) -> String {
        stringify_compact(&self.0)
    }

    /// The zero hash (parent sentinel of the genesis change set).
    pub const ZERO: Self = Self([0u8; 32]);
}

impl fmt::Debug for ChangeSetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChangeSetHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ChangeSetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for ChangeSetHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for ChangeSetHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for ChangeSetHash {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 32] = slice.try_into()?;
        Ok(Self(arr))
    }
}

/// Human-readable prefix of [`ResourceId`] strings.
pub const RESOURCE_ID_PREFIX: &str = "owsres";

/// A 16-byte resource identifier assigned when an action is applied.
///
/// Ids are derived from the change set hash, the action's index within the
/// change set, and a per-action counter, so every node replaying the same
/// ledger assigns the same ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(#[serde(with = "serde_bytes")] pub [u8; COMPACT_DIGEST_LEN]);

impl ResourceId {
    /// Derive the `counter`-th id for the action at `action_index`.
    pub fn derive(change_set: &ChangeSetHash, action_index: u32, counter: u32) -> Self {
        let mut input = Vec::with_capacity(32 + 8);
        input.extend_from_slice(change_set.as_bytes());
        input.extend_from_slice(&action_index.to_be_bytes());
        input.extend_from_slice(&counter.to_be_bytes());
        Self(digest_compact(&input))
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; COMPACT_DIGEST_LEN] {
        &self.0
    }

    /// Checksummed human-readable rendering (`owsres1...`).
    pub fn to_human_readable(&self) -> String {
        // The prefix is a valid constant; encoding cannot fail.
        stringify_human_readable(RESOURCE_ID_PREFIX, &self.0).unwrap_or_default()
    }

    /// Parse a human-readable resource id.
    pub fn parse_human_readable(s: &str) -> Result<Self, CoreError> {
        let bytes = parse_human_readable(s, RESOURCE_ID_PREFIX)?;
        let arr: [u8; COMPACT_DIGEST_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CoreError::InvalidHumanReadable("resource id must be 16 bytes".into()))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceId({})", hex::encode(self.0))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_human_readable())
    }
}

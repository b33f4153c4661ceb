//! Error types for the OWS ledger core.

use thiserror::Error;

use crate::crypto::PubKey;
use crate::types::{ChangeSetHash, ResourceId};

/// Errors raised while decoding persisted or wire bytes.
///
/// Every variant means the payload is unusable; none of them are retried.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("decoding error: {0}")]
    DecodingError(String),

    #[error("non-canonical encoding: {0}")]
    NonCanonical(String),

    #[error("unknown action type {category}/{name}")]
    UnknownActionType { category: String, name: String },

    #[error("malformed payload for {category}/{name}: {reason}")]
    MalformedPayload {
        category: String,
        name: String,
        reason: String,
    },

    #[error("invalid human-readable encoding: {0}")]
    InvalidHumanReadable(String),

    #[error("invalid compact encoding: {0}")]
    InvalidCompact(String),

    #[error("ledger contains no change sets")]
    EmptyLedger,
}

impl CoreError {
    /// Build a [`CoreError::MalformedPayload`] for the given tag.
    pub fn malformed(category: &str, name: &str, reason: impl Into<String>) -> Self {
        CoreError::MalformedPayload {
            category: category.to_string(),
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Chain validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("ledger contains no change sets")]
    EmptyChain,

    #[error("genesis change set has non-zero parent {0}")]
    GenesisHasParent(ChangeSetHash),

    #[error("broken link at change set {index}: expected parent {expected}, got {got}")]
    BrokenLink {
        index: usize,
        expected: ChangeSetHash,
        got: ChangeSetHash,
    },

    #[error("asset check failed at change set {index}: {reason}")]
    AssetIntegrity { index: usize, reason: String },
}

/// Registry construction failures. These indicate a build defect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("action {category}/{name} registered twice")]
    Duplicate { category: String, name: String },
}

/// Failures while applying an action to a resource manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("{category}/{name} is not supported by this resource manager")]
    Unsupported { category: String, name: String },

    #[error("task {0} already exists")]
    DuplicateTask(ResourceId),

    #[error("user {0} already exists")]
    DuplicateUser(PubKey),

    #[error("resource error: {0}")]
    Resource(String),
}

/// Failures resolving the genesis set from configuration.
#[derive(Debug, Error)]
pub enum GenesisError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("genesis configuration is not valid compact encoding: {0}")]
    InvalidEncoding(CoreError),

    #[error("genesis set could not be decoded: {0}")]
    Decode(CoreError),
}

//! Error types for the node.
//!
//! [`LedgerError`] covers a proposed append and is always recoverable: the
//! ledger is unchanged when one is returned. [`StartupError`] covers
//! establishing the initial ledger and is fatal for the process.

use ows_ledger_core::{
    ApplyError, ChangeSetHash, CoreError, GenesisError, RegistryError, ValidationError,
};
use ows_ledger_store::StoreError;
use thiserror::Error;

use crate::messages::RejectCode;

/// Errors from proposing a change set.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The proposed bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] CoreError),

    /// The extended chain failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The change set could not be applied to the current resources.
    #[error("apply error: {0}")]
    Apply(#[from] ApplyError),

    /// The extended ledger could not be persisted.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// How a peer is told about this error.
    pub fn reject_code(&self) -> RejectCode {
        match self {
            LedgerError::Decode(_) => RejectCode::Malformed,
            LedgerError::Validation(_) | LedgerError::Apply(_) => RejectCode::Invalid,
            LedgerError::Store(_) => RejectCode::Internal,
        }
    }
}

/// Result type for node operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that prevent a node from establishing its ledger.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("action registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("genesis: {0}")]
    Genesis(#[from] GenesisError),

    /// A stored ledger exists but cannot be decoded.
    #[error("stored ledger at {location} is corrupt: {source}")]
    CorruptLedger {
        location: String,
        #[source]
        source: CoreError,
    },

    /// A stored ledger decodes but fails validation.
    #[error("stored ledger is invalid: {0}")]
    InvalidLedger(ValidationError),

    /// The stored ledger was started from a different genesis set.
    #[error("stored ledger starts at {found}, configured genesis is {expected}")]
    GenesisMismatch {
        expected: ChangeSetHash,
        found: ChangeSetHash,
    },

    /// Replaying the ledger into the resource manager failed.
    #[error("replay failed: {0}")]
    Replay(#[from] ApplyError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

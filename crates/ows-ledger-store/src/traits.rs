//! LedgerStore trait: the abstract interface for ledger persistence.
//!
//! Ledgers are keyed by the hash of their genesis set. The store only moves
//! bytes; decoding and validation belong to the caller.

use std::path::PathBuf;

use async_trait::async_trait;
use ows_ledger_core::ChangeSetHash;

use crate::error::Result;

/// Async interface for ledger persistence.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Read the persisted ledger for a project.
    ///
    /// Returns `None` if nothing has been written yet.
    async fn read(&self, genesis: &ChangeSetHash) -> Result<Option<Vec<u8>>>;

    /// Replace the persisted ledger for a project.
    async fn write(&self, genesis: &ChangeSetHash, bytes: &[u8]) -> Result<()>;

    /// Where the ledger lives, for diagnostics. `None` for non-file stores.
    fn ledger_path(&self, genesis: &ChangeSetHash) -> Option<PathBuf>;
}

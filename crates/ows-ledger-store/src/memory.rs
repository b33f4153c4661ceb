//! In-memory implementation of the LedgerStore trait.
//!
//! This is primarily for testing. It has the same semantics as the file
//! store but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use ows_ledger_core::ChangeSetHash;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::traits::LedgerStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledgers: RwLock<HashMap<ChangeSetHash, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of projects with a stored ledger.
    pub async fn len(&self) -> usize {
        self.ledgers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.ledgers.read().await.is_empty()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn read(&self, genesis: &ChangeSetHash) -> Result<Option<Vec<u8>>> {
        Ok(self.ledgers.read().await.get(genesis).cloned())
    }

    async fn write(&self, genesis: &ChangeSetHash, bytes: &[u8]) -> Result<()> {
        self.ledgers.write().await.insert(*genesis, bytes.to_vec());
        Ok(())
    }

    fn ledger_path(&self, _genesis: &ChangeSetHash) -> Option<PathBuf> {
        None
    }
}

//! Project: one genesis set, its store, and the registry that decodes it.
//!
//! A project's ledger is addressed by the hash of its genesis set. Loading
//! either finds a stored ledger, which must decode and validate, or starts
//! a fresh one from the genesis change set and persists it.

use std::path::PathBuf;

use ows_ledger_core::{ActionRegistry, AssetValidator, ChangeSetHash, GenesisSet, Ledger};
use ows_ledger_store::{FileStore, LedgerStore, StoreError};

use crate::config::NodeConfig;
use crate::error::StartupError;

/// A project bound to a store.
pub struct Project<S: LedgerStore> {
    store: S,
    registry: ActionRegistry,
    genesis: GenesisSet,
    genesis_hash: ChangeSetHash,
}

impl Project<FileStore> {
    /// Open the project named by the configured genesis set, stored under
    /// the configured home directory.
    pub fn open(config: &NodeConfig, registry: ActionRegistry) -> Result<Self, StartupError> {
        let genesis = GenesisSet::lookup(&registry)?;
        Ok(Self::new(FileStore::new(&config.home_dir), registry, genesis))
    }
}

impl<S: LedgerStore> Project<S> {
    pub fn new(store: S, registry: ActionRegistry, genesis: GenesisSet) -> Self {
        let genesis_hash = genesis.hash();
        Self {
            store,
            registry,
            genesis,
            genesis_hash,
        }
    }

    pub fn genesis(&self) -> &GenesisSet {
        &self.genesis
    }

    /// The project identity.
    pub fn genesis_hash(&self) -> ChangeSetHash {
        self.genesis_hash
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Where the ledger is persisted, if the store is file-backed.
    pub fn ledger_path(&self) -> Option<PathBuf> {
        self.store.ledger_path(&self.genesis_hash)
    }

    /// Load the stored ledger, or initialise and persist a fresh one.
    ///
    /// A stored ledger that fails to decode or validate is an error, never
    /// silently replaced.
    pub async fn read_ledger(
        &self,
        assets: Option<&dyn AssetValidator>,
    ) -> Result<Ledger, StartupError> {
        let ledger = match self.store.read(&self.genesis_hash).await? {
            Some(bytes) => {
                let ledger = Ledger::decode(&bytes, &self.registry).map_err(|source| {
                    StartupError::CorruptLedger {
                        location: self.location(),
                        source,
                    }
                })?;
                ledger
                    .validate_all(assets)
                    .map_err(StartupError::InvalidLedger)?;

                let expected = self.genesis.to_change_set().hash();
                let found = ledger.genesis().hash();
                if expected != found {
                    return Err(StartupError::GenesisMismatch { expected, found });
                }

                tracing::info!(
                    head = %ledger.head(),
                    length = ledger.len(),
                    "loaded ledger"
                );
                ledger
            }
            None => {
                let ledger = Ledger::from_genesis(&self.genesis);
                ledger
                    .validate_all(assets)
                    .map_err(StartupError::InvalidLedger)?;
                self.write(&ledger).await?;

                tracing::info!(
                    head = %ledger.head(),
                    location = %self.location(),
                    "initialised ledger from genesis"
                );
                ledger
            }
        };

        Ok(ledger)
    }

    /// Persist the full ledger, replacing what was stored.
    pub async fn write(&self, ledger: &Ledger) -> Result<(), StoreError> {
        self.store.write(&self.genesis_hash, &ledger.encode()).await
    }

    fn location(&self) -> String {
        match self.ledger_path() {
            Some(path) => path.display().to_string(),
            None => format!("project {}", self.genesis_hash.to_compact()),
        }
    }
}

//! Ledger: the hash-linked chain of change sets for one project.
//!
//! # Invariants
//!
//! - The chain is never empty; `changes[0]` is the genesis change set.
//! - `head` always equals the hash of the last change set.
//! - Appends are validate-then-commit: a rejected append leaves the ledger
//!   untouched.
//!
//! A ledger has a single writer. Callers serialize mutations themselves
//! (see the service layer), the ledger does no locking of its own.

use ciborium::value::Value;

use crate::action::ResourceManager;
use crate::canonical::{decode_value, encode_canonical, expect_array};
use crate::change_set::ChangeSet;
use crate::error::{ApplyError, CoreError, ValidationError};
use crate::genesis::GenesisSet;
use crate::registry::ActionRegistry;
use crate::types::ChangeSetHash;
use crate::validation::{validate_chain, AssetValidator};

/// An ordered, non-empty chain of change sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    changes: Vec<ChangeSet>,
    head: ChangeSetHash,
}

impl Ledger {
    /// Seed a ledger with its genesis change set alone.
    pub fn new(genesis: ChangeSet) -> Self {
        let head = genesis.hash();
        Self {
            changes: vec![genesis],
            head,
        }
    }

    /// Seed a ledger from a genesis set.
    pub fn from_genesis(genesis: &GenesisSet) -> Self {
        Self::new(genesis.to_change_set())
    }

    /// Decode a persisted ledger.
    ///
    /// Linkage is not checked here; call [`Ledger::validate_all`].
    pub fn decode(bytes: &[u8], registry: &ActionRegistry) -> Result<Self, CoreError> {
        let changes = expect_array(decode_value(bytes)?, "ledger")?
            .into_iter()
            .map(|cs| ChangeSet::from_value(cs, registry))
            .collect::<Result<Vec<_>, _>>()?;

        let head = changes.last().ok_or(CoreError::EmptyLedger)?.hash();
        Ok(Self { changes, head })
    }

    /// Canonical bytes of the whole chain.
    pub fn encode(&self) -> Vec<u8> {
        let list = self.changes.iter().map(ChangeSet::to_value).collect();
        encode_canonical(&Value::Array(list))
    }

    /// Check linkage and, when a validator is given, asset integrity.
    ///
    /// Returns the first violation found.
    pub fn validate_all(&self, assets: Option<&dyn AssetValidator>) -> Result<(), ValidationError> {
        validate_chain(&self.changes, assets)
    }

    /// Append a change set if the extended chain validates.
    ///
    /// The candidate chain is built and validated on the side; the ledger
    /// is only replaced once validation succeeds. Returns the new head.
    pub fn append_change_set(
        &mut self,
        cs: ChangeSet,
        assets: Option<&dyn AssetValidator>,
    ) -> Result<ChangeSetHash, ValidationError> {
        let mut candidate = self.changes.clone();
        candidate.push(cs);
        validate_chain(&candidate, assets)?;

        self.changes = candidate;
        self.sync_head();
        Ok(self.head)
    }

    /// Find the change set whose own hash is `hash`.
    ///
    /// Searches from the most recent entry backward. Hashes are read from
    /// the chain's recorded links (the successor's parent, or `head` for
    /// the last entry), so the genesis hash, intermediate hashes and `head`
    /// all resolve to the change set they identify.
    pub fn get_change_set(&self, hash: &ChangeSetHash) -> Option<&ChangeSet> {
        self.position(hash).map(|i| &self.changes[i])
    }

    /// One hash per change set, in chain order.
    ///
    /// Entry `i` is the parent recorded by change set `i + 1`; the last
    /// entry is `head`.
    pub fn change_set_hashes(&self) -> Vec<ChangeSetHash> {
        self.changes
            .iter()
            .skip(1)
            .map(|cs| cs.parent)
            .chain(std::iter::once(self.head))
            .collect()
    }

    /// Truncate to the first `until + 1` change sets.
    ///
    /// Index 0 is always kept. An index past the end leaves the ledger as is.
    pub fn keep_change_sets(&mut self, until: usize) {
        self.changes.truncate(until.saturating_add(1));
        self.sync_head();
    }

    /// The change sets recorded after `hash`, oldest first.
    ///
    /// `None` if `hash` is not part of this chain. Empty when `hash` is the head.
    pub fn change_sets_after(&self, hash: &ChangeSetHash) -> Option<&[ChangeSet]> {
        self.position(hash).map(|i| &self.changes[i + 1..])
    }

    /// Apply every change set in order.
    pub fn apply_all(&self, resources: &mut dyn ResourceManager) -> Result<(), ApplyError> {
        for cs in &self.changes {
            cs.apply(resources)?;
        }
        Ok(())
    }

    /// Hash of the most recent change set.
    pub fn head(&self) -> ChangeSetHash {
        self.head
    }

    /// Number of change sets, genesis included.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Always false; a ledger holds at least its genesis change set.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn genesis(&self) -> &ChangeSet {
        &self.changes[0]
    }

    pub fn last(&self) -> &ChangeSet {
        &self.changes[self.changes.len() - 1]
    }

    pub fn changes(&self) -> &[ChangeSet] {
        &self.changes
    }

    fn position(&self, hash: &ChangeSetHash) -> Option<usize> {
        let last = self.changes.len() - 1;
        if self.head == *hash {
            return Some(last);
        }
        (0..last)
            .rev()
            .find(|&i| self.changes[i + 1].parent == *hash)
    }

    fn sync_head(&mut self) {
        self.head = self.last().hash();
    }
}

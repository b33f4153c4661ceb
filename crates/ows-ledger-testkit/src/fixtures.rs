//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use ciborium::value::Value;
use ows_ledger_actions::{default_registry, AddTask, AddUser};
use ows_ledger_core::canonical::{decode_value, encode_canonical};
use ows_ledger_core::{Action, ActionRegistry, ChangeSet, GenesisSet, Keypair, Ledger, PubKey};

/// Runtime used for every fixture task.
pub const TEST_RUNTIME: &str = "wasm";

/// A registry, a genesis set, and an admin key.
pub struct TestFixture {
    pub registry: ActionRegistry,
    pub genesis: GenesisSet,
    pub admin: Keypair,
}

impl TestFixture {
    /// Genesis: one task `genesis` and the admin user.
    pub fn new() -> Self {
        let admin = Keypair::from_seed(&[1; 32]);
        let genesis = GenesisSet::new(vec![add_task("genesis"), add_user(admin.public_key())]);
        Self::with_genesis(genesis, admin)
    }

    /// Genesis: one task per handler, no users.
    pub fn with_genesis_handlers(handlers: &[&str]) -> Self {
        let genesis = GenesisSet::new(handlers.iter().map(|h| add_task(h)).collect());
        Self::with_genesis(genesis, Keypair::from_seed(&[1; 32]))
    }

    fn with_genesis(genesis: GenesisSet, admin: Keypair) -> Self {
        Self {
            registry: default_registry().expect("shipped descriptors are unique"),
            genesis,
            admin,
        }
    }

    pub fn admin(&self) -> PubKey {
        self.admin.public_key()
    }

    /// One `AddTask` per handler.
    pub fn tasks(&self, handlers: &[&str]) -> Vec<Arc<dyn Action>> {
        handlers.iter().map(|h| add_task(h)).collect()
    }

    /// A ledger holding only the genesis change set.
    pub fn ledger(&self) -> Ledger {
        Ledger::from_genesis(&self.genesis)
    }

    /// A change set extending `ledger`'s head with one task per handler.
    pub fn next_change_set(&self, ledger: &Ledger, handlers: &[&str]) -> ChangeSet {
        ChangeSet::new(ledger.head(), self.tasks(handlers))
    }

    /// A valid ledger of `len` change sets, genesis included.
    pub fn chain(&self, len: usize) -> Ledger {
        let mut ledger = self.ledger();
        for i in 1..len {
            let cs = self.next_change_set(&ledger, &[format!("task-{i}").as_str()]);
            ledger
                .append_change_set(cs, None)
                .expect("fixture chain links to its head");
        }
        ledger
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

pub fn add_task(handler: &str) -> Arc<dyn Action> {
    Arc::new(AddTask::new(TEST_RUNTIME, handler))
}

pub fn add_user(key: PubKey) -> Arc<dyn Action> {
    Arc::new(AddUser::new(key))
}

/// Encode change sets as a stored ledger without checking linkage.
///
/// Used to plant invalid ledgers in a store.
pub fn encode_unchecked(changes: &[ChangeSet]) -> Vec<u8> {
    let list = changes
        .iter()
        .map(|cs| decode_value(&cs.encode()).expect("change set encoding is valid CBOR"))
        .collect();
    encode_canonical(&Value::Array(list))
}

//! Proptest generators for property-based testing.

use std::sync::Arc;

use proptest::prelude::*;

use ows_ledger_actions::{AddTask, AddUser};
use ows_ledger_core::{Action, ChangeSet, ChangeSetHash, GenesisSet, Keypair, Ledger, PubKey};

/// Generate a random ChangeSetHash.
pub fn change_set_hash() -> impl Strategy<Value = ChangeSetHash> {
    any::<[u8; 32]>().prop_map(ChangeSetHash::from_bytes)
}

/// Generate a valid public key.
pub fn public_key() -> impl Strategy<Value = PubKey> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed).public_key())
}

/// Generate a handler name.
pub fn handler() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}".prop_map(String::from)
}

/// Generate a runtime name, possibly empty.
pub fn runtime() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-z]{1,8}".prop_map(String::from)]
}

/// Generate any shipped action.
pub fn action() -> impl Strategy<Value = Arc<dyn Action>> {
    prop_oneof![
        (runtime(), handler()).prop_map(|(r, h)| Arc::new(AddTask::new(r, h)) as Arc<dyn Action>),
        public_key().prop_map(|k| Arc::new(AddUser::new(k)) as Arc<dyn Action>),
    ]
}

/// Generate a change set with an arbitrary parent.
pub fn change_set(max_actions: usize) -> impl Strategy<Value = ChangeSet> {
    (
        change_set_hash(),
        prop::collection::vec(action(), 0..=max_actions),
    )
        .prop_map(|(parent, actions)| ChangeSet::new(parent, actions))
}

/// Parameters for generating a valid chain.
///
/// Each step is the handler list of one change set. Only tasks are used,
/// so the chain also passes the replay asset check.
#[derive(Debug, Clone)]
pub struct ChainParams {
    pub genesis: Vec<String>,
    pub steps: Vec<Vec<String>>,
}

impl Arbitrary for ChainParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            prop::collection::vec(handler(), 1..4),
            prop::collection::vec(prop::collection::vec(handler(), 0..4), 0..8),
        )
            .prop_map(|(genesis, steps)| ChainParams { genesis, steps })
            .boxed()
    }
}

/// Build the ledger described by the parameters.
pub fn ledger_from_params(params: &ChainParams) -> Ledger {
    let tasks = |handlers: &[String]| -> Vec<Arc<dyn Action>> {
        handlers
            .iter()
            .map(|h| Arc::new(AddTask::new("", h.as_str())) as Arc<dyn Action>)
            .collect()
    };

    let mut ledger = Ledger::from_genesis(&GenesisSet::new(tasks(&params.genesis)));
    for step in &params.steps {
        let cs = ChangeSet::new(ledger.head(), tasks(step));
        ledger
            .append_change_set(cs, None)
            .expect("generated step links to its head");
    }
    ledger
}

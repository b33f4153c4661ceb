//! Genesis set: the externally agreed root of a project's ledger.
//!
//! A genesis set is encoded as a canonical CBOR array of tagged action byte
//! strings. Its hash is the project's identity and determines where the
//! ledger is stored. Nodes receive it through the [`GENESIS_ENV_VAR`]
//! environment variable as compact (URL-safe base64) text.

use std::sync::Arc;

use ciborium::value::Value;

use crate::action::Action;
use crate::bytes::{parse_compact, stringify_compact};
use crate::canonical::{decode_value, encode_canonical, expect_array, expect_bytes};
use crate::change_set::ChangeSet;
use crate::error::{CoreError, GenesisError};
use crate::registry::{encode_action, ActionRegistry};
use crate::types::ChangeSetHash;

/// Environment variable holding the compact-encoded genesis set.
pub const GENESIS_ENV_VAR: &str = "CWS_GENESIS";

/// The ordered actions establishing a chain's root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisSet {
    change_set: ChangeSet,
}

impl GenesisSet {
    /// Create a genesis set from actions.
    pub fn new(actions: Vec<Arc<dyn Action>>) -> Self {
        Self {
            change_set: ChangeSet::new(ChangeSetHash::ZERO, actions),
        }
    }

    /// The genesis actions.
    pub fn actions(&self) -> &[Arc<dyn Action>] {
        &self.change_set.actions
    }

    /// Canonical encoding: a list of tagged action byte strings.
    pub fn encode(&self) -> Vec<u8> {
        let list = self
            .actions()
            .iter()
            .map(|a| Value::Bytes(encode_action(a.as_ref())))
            .collect();
        encode_canonical(&Value::Array(list))
    }

    /// Compact text form, as carried by [`GENESIS_ENV_VAR`].
    pub fn encode_compact(&self) -> String {
        stringify_compact(&self.encode())
    }

    /// The project identity.
    pub fn hash(&self) -> ChangeSetHash {
        ChangeSetHash::digest(&self.encode())
    }

    /// Decode a genesis set, dispatching each action through the registry.
    pub fn decode(bytes: &[u8], registry: &ActionRegistry) -> Result<Self, CoreError> {
        let actions = expect_array(decode_value(bytes)?, "genesis set")?
            .into_iter()
            .map(|a| registry.decode(&expect_bytes(a, "genesis action")?))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(actions))
    }

    /// The first change set of every ledger built from this genesis set.
    pub fn to_change_set(&self) -> ChangeSet {
        self.change_set.clone()
    }

    /// Resolve a genesis set from a raw configuration value.
    ///
    /// `None` means the value is not configured.
    pub fn from_config(raw: Option<&str>, registry: &ActionRegistry) -> Result<Self, GenesisError> {
        let raw = raw.ok_or(GenesisError::Missing(GENESIS_ENV_VAR))?;
        let bytes = parse_compact(raw.trim()).map_err(GenesisError::InvalidEncoding)?;
        Self::decode(&bytes, registry).map_err(GenesisError::Decode)
    }

    /// Resolve the genesis set from [`GENESIS_ENV_VAR`].
    ///
    /// A node cannot operate without a genesis set, so callers treat any
    /// error here as fatal.
    pub fn lookup(registry: &ActionRegistry) -> Result<Self, GenesisError> {
        let raw = std::env::var(GENESIS_ENV_VAR).ok();
        Self::from_config(raw.as_deref(), registry)
    }
}

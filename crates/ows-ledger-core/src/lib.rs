//! # OWS Ledger Core
//!
//! Pure primitives for the OWS ledger: change sets, genesis sets, the action
//! registry, and canonical encoding.
//!
//! This crate contains no storage and no networking. The only environment
//! access is [`GenesisSet::lookup`].
//!
//! ## Key Types
//!
//! - [`Ledger`] - The hash-linked chain of change sets for one project
//! - [`ChangeSet`] - An ordered batch of actions linked to its parent
//! - [`GenesisSet`] - The externally agreed root of a ledger
//! - [`ActionRegistry`] - Immutable `(category, name)` to decoder mapping
//! - [`ChangeSetHash`] - Content-addressed identifier (Blake3 hash)
//!
//! ## Canonicalization
//!
//! Everything that is hashed is encoded using deterministic CBOR. See the
//! [`canonical`] module.

pub mod action;
pub mod bytes;
pub mod canonical;
pub mod change_set;
pub mod crypto;
pub mod error;
pub mod genesis;
pub mod ledger;
pub mod registry;
pub mod types;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use action::{Action, ResourceManager};
pub use bytes::{
    digest_compact, parse_compact, parse_human_readable, stringify_compact,
    stringify_human_readable,
};
pub use change_set::ChangeSet;
pub use crypto::{Keypair, PubKey};
pub use error::{ApplyError, CoreError, GenesisError, RegistryError, ValidationError};
pub use genesis::{GenesisSet, GENESIS_ENV_VAR};
pub use ledger::Ledger;
pub use registry::{encode_action, ActionDescriptor, ActionRegistry, DecodeFn};
pub use types::{ChangeSetHash, ResourceId};
pub use validation::{validate_chain, AssetValidator};

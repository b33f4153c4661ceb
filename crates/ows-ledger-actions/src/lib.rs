//! # OWS Ledger Actions
//!
//! The action kinds shipped with the OWS ledger.
//!
//! ## Overview
//!
//! The ledger core never knows the shape of an action. Each kind in this
//! crate implements [`Action`](ows_ledger_core::Action) and exposes an
//! [`ActionDescriptor`] so the registry can decode it by tag.
//!
//! ## Action Kinds
//!
//! - **tasks/AddTask**: registers a task handler under a fresh resource id
//! - **permissions/AddUser**: registers a user by public key
//!
//! ## Attribute Encoding
//!
//! Attributes are canonical CBOR maps with small integer keys. Every field
//! is always written, and decoding refuses missing or unknown keys, so a
//! decoded action re-encodes to the exact bytes it came from.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ows_ledger_actions::{default_registry, AddTask};
//! use ows_ledger_core::{encode_action, Action};
//!
//! let registry = default_registry().unwrap();
//! let action: Arc<dyn Action> = Arc::new(AddTask::new("wasm", "h1"));
//! let decoded = registry.decode(&encode_action(action.as_ref())).unwrap();
//! assert_eq!(decoded.name(), "AddTask");
//! ```

pub mod permissions;
pub mod tasks;

pub use permissions::AddUser;
pub use tasks::AddTask;

use ows_ledger_core::{ActionDescriptor, ActionRegistry, RegistryError};

/// Every action kind this crate ships, in registration order.
pub const DESCRIPTORS: &[ActionDescriptor] = &[tasks::DESCRIPTOR, permissions::DESCRIPTOR];

/// Build the registry of all shipped action kinds.
///
/// Call once at startup and pass the result by reference.
pub fn default_registry() -> Result<ActionRegistry, RegistryError> {
    ActionRegistry::from_descriptors(DESCRIPTORS)
}

//! Actions: polymorphic units of state mutation.
//!
//! The chain never knows the shape of an action. It only relies on the
//! capability set exposed by [`Action`]: a `(category, name)` tag, a canonical
//! encoding of the action's own fields, and `apply`.

use std::fmt;

use crate::crypto::PubKey;
use crate::error::ApplyError;
use crate::types::ResourceId;

/// The mutable application state actions are applied to.
///
/// Implementations live outside the core; the ledger only calls through
/// this interface. Each method defaults to [`ApplyError::Unsupported`], so a
/// manager that tracks only some resources refuses the others.
pub trait ResourceManager {
    /// Register a task under a freshly generated id.
    fn add_task(&mut self, _id: ResourceId, _runtime: &str, _handler: &str) -> Result<(), ApplyError> {
        Err(ApplyError::Unsupported {
            category: "tasks".into(),
            name: "AddTask".into(),
        })
    }

    /// Register a user by public key.
    fn add_user(&mut self, _key: PubKey) -> Result<(), ApplyError> {
        Err(ApplyError::Unsupported {
            category: "permissions".into(),
            name: "AddUser".into(),
        })
    }
}

/// A decodable, appliable ledger action.
pub trait Action: fmt::Debug + Send + Sync {
    /// The category half of the registry tag (e.g. `"tasks"`).
    fn category(&self) -> &str;

    /// The name half of the registry tag (e.g. `"AddTask"`).
    fn name(&self) -> &str;

    /// Canonical encoding of this action's own fields.
    fn encode_attributes(&self) -> Vec<u8>;

    /// Apply this action.
    ///
    /// `next_id` yields a fresh resource id on every call.
    fn apply(
        &self,
        resources: &mut dyn ResourceManager,
        next_id: &mut dyn FnMut() -> ResourceId,
    ) -> Result<(), ApplyError>;
}

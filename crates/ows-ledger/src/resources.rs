//! In-memory resource manager and the replay asset check.

use std::collections::{BTreeMap, BTreeSet};

use ows_ledger_core::{
    ApplyError, AssetValidator, ChangeSet, PubKey, ResourceId, ResourceManager, ValidationError,
};

/// A registered task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub runtime: String,
    pub handler: String,
}

/// Resource state built by replaying a ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryResources {
    tasks: BTreeMap<ResourceId, Task>,
    users: BTreeSet<PubKey>,
}

impl InMemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task(&self, id: &ResourceId) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// All tasks, ordered by id.
    pub fn tasks(&self) -> impl Iterator<Item = (&ResourceId, &Task)> {
        self.tasks.iter()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn has_user(&self, key: &PubKey) -> bool {
        self.users.contains(key)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

impl ResourceManager for InMemoryResources {
    fn add_task(&mut self, id: ResourceId, runtime: &str, handler: &str) -> Result<(), ApplyError> {
        if self.tasks.contains_key(&id) {
            return Err(ApplyError::DuplicateTask(id));
        }
        self.tasks.insert(
            id,
            Task {
                runtime: runtime.to_string(),
                handler: handler.to_string(),
            },
        );
        Ok(())
    }

    fn add_user(&mut self, key: PubKey) -> Result<(), ApplyError> {
        if !self.users.insert(key) {
            return Err(ApplyError::DuplicateUser(key));
        }
        Ok(())
    }
}

/// Asset check that replays the whole chain into fresh resources.
///
/// A chain passes when every change set applies cleanly in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayCheck;

impl AssetValidator for ReplayCheck {
    fn validate_chain(&self, changes: &[ChangeSet]) -> Result<(), ValidationError> {
        let mut resources = InMemoryResources::new();
        for (index, cs) in changes.iter().enumerate() {
            cs.apply(&mut resources)
                .map_err(|e| ValidationError::AssetIntegrity {
                    index,
                    reason: e.to_string(),
                })?;
        }
        Ok(())
    }
}

/// The asset check to run, if enabled.
pub fn asset_validator(enabled: bool) -> Option<&'static dyn AssetValidator> {
    if enabled {
        Some(&ReplayCheck)
    } else {
        None
    }
}

//! Minimal action and resource manager for unit tests in this crate.

use std::sync::Arc;

use ciborium::value::Value;

use crate::action::{Action, ResourceManager};
use crate::canonical::{
    decode_value, encode_canonical, expect_consumed, expect_map, expect_text, int_map, take_field,
};
use crate::change_set::ChangeSet;
use crate::crypto::PubKey;
use crate::error::{ApplyError, CoreError};
use crate::registry::{ActionDescriptor, ActionRegistry};
use crate::types::{ChangeSetHash, ResourceId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub text: String,
}

impl Note {
    pub fn new(text: &str) -> Self {
        Self { text: text.to_string() }
    }
}

impl Action for Note {
    fn category(&self) -> &str {
        "test"
    }

    fn name(&self) -> &str {
        "Note"
    }

    fn encode_attributes(&self) -> Vec<u8> {
        encode_canonical(&int_map(vec![(0, Value::Text(self.text.clone()))]))
    }

    fn apply(
        &self,
        resources: &mut dyn ResourceManager,
        next_id: &mut dyn FnMut() -> ResourceId,
    ) -> Result<(), ApplyError> {
        if self.text == "fail" {
            return Err(ApplyError::Resource("note refused".into()));
        }
        resources.add_task(next_id(), "note", &self.text)
    }
}

fn decode_note(bytes: &[u8]) -> Result<Arc<dyn Action>, CoreError> {
    let malformed = |e: CoreError| CoreError::malformed("test", "Note", e.to_string());
    let mut map = expect_map(decode_value(bytes).map_err(malformed)?, "note").map_err(malformed)?;
    let text = take_field(&mut map, 0)
        .ok_or_else(|| CoreError::malformed("test", "Note", "missing text"))?;
    let text = expect_text(text, "note text").map_err(malformed)?;
    expect_consumed(map, "note").map_err(malformed)?;
    Ok(Arc::new(Note { text }))
}

pub const NOTE_DESCRIPTOR: ActionDescriptor = ActionDescriptor {
    category: "test",
    name: "Note",
    decode: decode_note,
};

pub fn note_registry() -> ActionRegistry {
    ActionRegistry::from_descriptors(&[NOTE_DESCRIPTOR]).unwrap()
}

pub fn notes(texts: &[&str]) -> Vec<Arc<dyn Action>> {
    texts
        .iter()
        .map(|t| Arc::new(Note::new(t)) as Arc<dyn Action>)
        .collect()
}

pub fn change_set(parent: ChangeSetHash, texts: &[&str]) -> ChangeSet {
    ChangeSet::new(parent, notes(texts))
}

/// Records every call for assertions.
#[derive(Debug, Default)]
pub struct RecordingResources {
    pub tasks: Vec<(ResourceId, String, String)>,
    pub users: Vec<PubKey>,
}

impl ResourceManager for RecordingResources {
    fn add_task(&mut self, id: ResourceId, runtime: &str, handler: &str) -> Result<(), ApplyError> {
        self.tasks.push((id, runtime.to_string(), handler.to_string()));
        Ok(())
    }

    fn add_user(&mut self, key: PubKey) -> Result<(), ApplyError> {
        self.users.push(key);
        Ok(())
    }
}

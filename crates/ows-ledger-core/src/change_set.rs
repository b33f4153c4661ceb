//! Change set: an ordered batch of actions linked to its parent's hash.
//!
//! Canonical encoding is the CBOR array
//! `[parent: bytes(32), [encoded action: bytes, ...]]` and the change set
//! hash is the Blake3 digest of those bytes.

use std::sync::Arc;

use ciborium::value::Value;

use crate::action::{Action, ResourceManager};
use crate::canonical::{decode_value, encode_canonical, expect_array, expect_bytes};
use crate::error::{ApplyError, CoreError};
use crate::registry::{encode_action, ActionRegistry};
use crate::types::{ChangeSetHash, ResourceId};

/// An ordered list of actions plus a link to the previous change set.
#[derive(Debug, Clone)]
pub struct ChangeSet {
    /// The hash of the preceding change set ([`ChangeSetHash::ZERO`] for genesis).
    pub parent: ChangeSetHash,

    /// Actions, applied in order.
    pub actions: Vec<Arc<dyn Action>>,
}

impl ChangeSet {
    /// Create a change set.
    pub fn new(parent: ChangeSetHash, actions: Vec<Arc<dyn Action>>) -> Self {
        Self { parent, actions }
    }

    /// Whether this change set claims to be a chain root.
    pub fn is_root(&self) -> bool {
        self.parent == ChangeSetHash::ZERO
    }

    /// Canonical bytes of this change set.
    pub fn encode(&self) -> Vec<u8> {
        encode_canonical(&self.to_value())
    }

    /// Compute the content hash.
    pub fn hash(&self) -> ChangeSetHash {
        ChangeSetHash::digest(&self.encode())
    }

    /// Decode a change set, dispatching each action through the registry.
    pub fn decode(bytes: &[u8], registry: &ActionRegistry) -> Result<Self, CoreError> {
        Self::from_value(decode_value(bytes)?, registry)
    }

    /// Apply every action in order.
    ///
    /// Each action gets its own id generator. Stops at the first failing
    /// action; earlier actions of this change set stay applied.
    pub fn apply(&self, resources: &mut dyn ResourceManager) -> Result<(), ApplyError> {
        let hash = self.hash();
        for (index, action) in self.actions.iter().enumerate() {
            let mut counter = 0u32;
            let mut next_id = || {
                counter += 1;
                ResourceId::derive(&hash, index as u32, counter)
            };
            action.apply(resources, &mut next_id)?;
        }
        Ok(())
    }

    pub(crate) fn to_value(&self) -> Value {
        let actions = self
            .actions
            .iter()
            .map(|a| Value::Bytes(encode_action(a.as_ref())))
            .collect();
        Value::Array(vec![Value::Bytes(self.parent.0.to_vec()), Value::Array(actions)])
    }

    pub(crate) fn from_value(value: Value, registry: &ActionRegistry) -> Result<Self, CoreError> {
        let items = expect_array(value, "change set")?;
        let [parent, actions]: [Value; 2] = items
            .try_into()
            .map_err(|_| CoreError::DecodingError("change set: expected 2 elements".into()))?;

        let parent = expect_bytes(parent, "change set parent")?;
        let parent = ChangeSetHash::try_from(parent.as_slice())
            .map_err(|_| CoreError::DecodingError("change set parent: expected 32 bytes".into()))?;

        let actions = expect_array(actions, "change set actions")?
            .into_iter()
            .map(|a| registry.decode(&expect_bytes(a, "encoded action")?))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { parent, actions })
    }
}

impl PartialEq for ChangeSet {
    fn eq(&self, other: &Self) -> bool {
        self.parent == other.parent
            && self.actions.len() == other.actions.len()
            && self
                .actions
                .iter()
                .zip(&other.actions)
                .all(|(a, b)| encode_action(a.as_ref()) == encode_action(b.as_ref()))
    }
}

impl Eq for ChangeSet {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{change_set, note_registry, RecordingResources};

    #[test]
    fn test_encoding_deterministic() {
        let cs = change_set(ChangeSetHash::from_bytes([1; 32]), &["a", "b"]);
        assert_eq!(cs.encode(), cs.encode());
        assert_eq!(cs.hash(), cs.hash());
    }

    #[test]
    fn test_identical_content_hashes_identically() {
        let a = change_set(ChangeSetHash::from_bytes([1; 32]), &["a", "b"]);
        let b = change_set(ChangeSetHash::from_bytes([1; 32]), &["a", "b"]);
        assert_eq!(a.hash(), b.hash());
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_covers_parent_and_order() {
        let base = change_set(ChangeSetHash::from_bytes([1; 32]), &["a", "b"]);
        let other_parent = change_set(ChangeSetHash::from_bytes([2; 32]), &["a", "b"]);
        let reordered = change_set(ChangeSetHash::from_bytes([1; 32]), &["b", "a"]);

        assert_ne!(base.hash(), other_parent.hash());
        assert_ne!(base.hash(), reordered.hash());
    }

    #[test]
    fn test_decode_reencode_is_byte_identical() {
        let registry = note_registry();
        let cs = change_set(ChangeSetHash::from_bytes([9; 32]), &["x", "y", "z"]);

        let bytes = cs.encode();
        let decoded = ChangeSet::decode(&bytes, &registry).unwrap();

        assert_eq!(decoded, cs);
        assert_eq!(decoded.encode(), bytes);
        assert_eq!(decoded.hash(), cs.hash());
    }

    #[test]
    fn test_empty_change_set_roundtrip() {
        let registry = note_registry();
        let cs = change_set(ChangeSetHash::ZERO, &[]);
        let decoded = ChangeSet::decode(&cs.encode(), &registry).unwrap();
        assert!(decoded.actions.is_empty());
        assert!(decoded.is_root());
    }

    #[test]
    fn test_decode_rejects_short_parent() {
        let registry = note_registry();
        let value = Value::Array(vec![Value::Bytes(vec![0; 31]), Value::Array(vec![])]);
        let result = ChangeSet::decode(&encode_canonical(&value), &registry);
        assert!(matches!(result, Err(CoreError::DecodingError(_))));
    }

    #[test]
    fn test_decode_refuses_long_parent_length() {
        let registry = note_registry();
        let bytes = change_set(ChangeSetHash::from_bytes([9; 32]), &["x"]).encode();
        assert_eq!(bytes[..3], [0x82, 0x58, 0x20]);

        // Parent length stated with a two-byte argument.
        let mut long = vec![0x82, 0x59, 0x00, 0x20];
        long.extend_from_slice(&bytes[3..]);

        assert!(matches!(
            ChangeSet::decode(&long, &registry),
            Err(CoreError::NonCanonical(_))
        ));
    }

    #[test]
    fn test_decode_refuses_non_canonical_action() {
        let registry = note_registry();
        // Note attributes {0: "x"} with the key written as a one-byte argument.
        let attributes = vec![0xa1, 0x18, 0x00, 0x61, b'x'];
        let action = Value::Array(vec![
            Value::Text("test".into()),
            Value::Text("Note".into()),
            Value::Bytes(attributes),
        ]);
        let value = Value::Array(vec![
            Value::Bytes(vec![0; 32]),
            Value::Array(vec![Value::Bytes(encode_canonical(&action))]),
        ]);

        assert!(matches!(
            ChangeSet::decode(&encode_canonical(&value), &registry),
            Err(CoreError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_decode_unknown_action_fails() {
        let registry = ActionRegistry::default();
        let cs = change_set(ChangeSetHash::ZERO, &["a"]);
        let result = ChangeSet::decode(&cs.encode(), &registry);
        assert!(matches!(result, Err(CoreError::UnknownActionType { .. })));
    }

    #[test]
    fn test_apply_in_order_with_fresh_ids() {
        let cs = change_set(ChangeSetHash::ZERO, &["first", "second"]);
        let mut resources = RecordingResources::default();

        cs.apply(&mut resources).unwrap();

        assert_eq!(resources.tasks.len(), 2);
        assert_eq!(resources.tasks[0].2, "first");
        assert_eq!(resources.tasks[1].2, "second");
        assert_ne!(resources.tasks[0].0, resources.tasks[1].0);

        // Ids are deterministic for the same change set.
        let mut again = RecordingResources::default();
        cs.apply(&mut again).unwrap();
        assert_eq!(resources.tasks, again.tasks);
    }

    #[test]
    fn test_apply_stops_at_failing_action() {
        let cs = change_set(ChangeSetHash::ZERO, &["ok", "fail", "never"]);
        let mut resources = RecordingResources::default();

        let result = cs.apply(&mut resources);

        assert!(matches!(result, Err(ApplyError::Resource(_))));
        assert_eq!(resources.tasks.len(), 1);
    }
}

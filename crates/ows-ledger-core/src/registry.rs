//! The action registry: `(category, name)` tag to decoder.
//!
//! The registry is built once at startup from a static list of
//! [`ActionDescriptor`]s and is immutable afterwards. It is passed by
//! reference into every decode call, so concurrent readers need no locking.
//!
//! ## Envelope
//!
//! An encoded action is the canonical CBOR array
//! `[category: text, name: text, attributes: bytes]`, where `attributes` is
//! the action's own canonical encoding of its fields.

use std::collections::BTreeMap;
use std::sync::Arc;

use ciborium::value::Value;

use crate::action::Action;
use crate::canonical::{decode_value, encode_canonical, expect_array, expect_bytes, expect_text};
use crate::error::{CoreError, RegistryError};

/// Decodes an attribute payload into an action.
pub type DecodeFn = fn(&[u8]) -> Result<Arc<dyn Action>, CoreError>;

/// Static description of one decodable action shape.
#[derive(Clone, Copy)]
pub struct ActionDescriptor {
    pub category: &'static str,
    pub name: &'static str,
    pub decode: DecodeFn,
}

impl std::fmt::Debug for ActionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ActionDescriptor({}/{})", self.category, self.name)
    }
}

/// Immutable mapping from `(category, name)` to a decoder.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    decoders: BTreeMap<(String, String), DecodeFn>,
}

impl ActionRegistry {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Build a registry from a list of descriptors.
    ///
    /// Fails if any `(category, name)` pair appears twice.
    pub fn from_descriptors(descriptors: &[ActionDescriptor]) -> Result<Self, RegistryError> {
        let mut builder = Self::builder();
        for d in descriptors {
            builder.register(d.category, d.name, d.decode)?;
        }
        Ok(builder.build())
    }

    /// Check whether a tag is registered.
    pub fn contains(&self, category: &str, name: &str) -> bool {
        self.decoders
            .contains_key(&(category.to_string(), name.to_string()))
    }

    /// Number of registered action shapes.
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Whether no action shapes are registered.
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Registered tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.decoders.keys().map(|(c, n)| (c.as_str(), n.as_str()))
    }

    /// Decode an action from its tagged envelope.
    ///
    /// The decoded action must re-encode to exactly `bytes`; a decoder that
    /// drops or normalizes anything makes the payload malformed, since the
    /// change set hash would otherwise differ from the sender's.
    pub fn decode(&self, bytes: &[u8]) -> Result<Arc<dyn Action>, CoreError> {
        let action = self.decode_envelope(decode_value(bytes)?)?;
        if encode_action(action.as_ref()) != bytes {
            return Err(CoreError::malformed(
                action.category(),
                action.name(),
                "decoded action does not re-encode to the received bytes",
            ));
        }
        Ok(action)
    }

    fn decode_envelope(&self, value: Value) -> Result<Arc<dyn Action>, CoreError> {
        let items = expect_array(value, "action")?;
        let [category, name, attributes]: [Value; 3] = items
            .try_into()
            .map_err(|_| CoreError::DecodingError("action: expected 3 elements".into()))?;

        let category = expect_text(category, "action category")?;
        let name = expect_text(name, "action name")?;
        let attributes = expect_bytes(attributes, "action attributes")?;

        let decode = self
            .decoders
            .get(&(category.clone(), name.clone()))
            .ok_or(CoreError::UnknownActionType { category, name })?;

        decode(&attributes)
    }
}

/// Encode an action with its `(category, name)` tag.
pub fn encode_action(action: &dyn Action) -> Vec<u8> {
    encode_canonical(&action_value(action))
}

pub(crate) fn action_value(action: &dyn Action) -> Value {
    Value::Array(vec![
        Value::Text(action.category().to_string()),
        Value::Text(action.name().to_string()),
        Value::Bytes(action.encode_attributes()),
    ])
}

/// Builder for [`ActionRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    decoders: BTreeMap<(String, String), DecodeFn>,
}

impl RegistryBuilder {
    /// Register a decoder for a tag.
    pub fn register(
        &mut self,
        category: &str,
        name: &str,
        decode: DecodeFn,
    ) -> Result<&mut Self, RegistryError> {
        let key = (category.to_string(), name.to_string());
        if self.decoders.contains_key(&key) {
            return Err(RegistryError::Duplicate {
                category: key.0,
                name: key.1,
            });
        }
        self.decoders.insert(key, decode);
        Ok(self)
    }

    /// Freeze into an immutable registry.
    pub fn build(self) -> ActionRegistry {
        ActionRegistry {
            decoders: self.decoders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::int_map;
    use crate::test_support::{note_registry, Note, NOTE_DESCRIPTOR};

    #[test]
    fn test_dispatch_returns_matching_tag() {
        let registry = note_registry();
        let note = Note::new("hello");

        let bytes = encode_action(&note);
        let decoded = registry.decode(&bytes).unwrap();

        assert_eq!(decoded.category(), "test");
        assert_eq!(decoded.name(), "Note");
        assert_eq!(encode_action(decoded.as_ref()), bytes);
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let registry = ActionRegistry::default();
        let bytes = encode_action(&Note::new("hello"));

        match registry.decode(&bytes) {
            Err(CoreError::UnknownActionType { category, name }) => {
                assert_eq!(category, "test");
                assert_eq!(name, "Note");
            }
            other => panic!("expected UnknownActionType, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_payload_is_reported() {
        let registry = note_registry();
        let envelope = Value::Array(vec![
            Value::Text("test".into()),
            Value::Text("Note".into()),
            Value::Bytes(vec![0xff]),
        ]);

        let result = registry.decode(&encode_canonical(&envelope));
        assert!(matches!(result, Err(CoreError::MalformedPayload { .. })));
    }

    fn decode_lossy(_bytes: &[u8]) -> Result<Arc<dyn Action>, CoreError> {
        Ok(Arc::new(Note::new("fixed")))
    }

    #[test]
    fn test_lossy_decoder_is_refused() {
        let registry = ActionRegistry::from_descriptors(&[ActionDescriptor {
            category: "test",
            name: "Note",
            decode: decode_lossy,
        }])
        .unwrap();

        assert!(registry.decode(&encode_action(&Note::new("fixed"))).is_ok());
        assert!(matches!(
            registry.decode(&encode_action(&Note::new("other"))),
            Err(CoreError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_non_canonical_envelope_is_refused() {
        let registry = note_registry();
        let bytes = encode_action(&Note::new("hello"));
        assert_eq!(bytes[0], 0x83);

        // The same envelope with its array length in a one-byte argument.
        let mut long = vec![0x98, 0x03];
        long.extend_from_slice(&bytes[1..]);

        assert!(matches!(
            registry.decode(&long),
            Err(CoreError::NonCanonical(_))
        ));
    }

    #[test]
    fn test_unknown_attribute_key_is_malformed() {
        let registry = note_registry();
        let attributes = int_map(vec![
            (0, Value::Text("hello".into())),
            (7, Value::Null),
        ]);
        let envelope = Value::Array(vec![
            Value::Text("test".into()),
            Value::Text("Note".into()),
            Value::Bytes(encode_canonical(&attributes)),
        ]);

        assert!(matches!(
            registry.decode(&encode_canonical(&envelope)),
            Err(CoreError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_malformed_envelope_is_a_decoding_error() {
        let registry = note_registry();

        let two_elements = Value::Array(vec![Value::Text("test".into()), Value::Text("Note".into())]);
        assert!(matches!(
            registry.decode(&encode_canonical(&two_elements)),
            Err(CoreError::DecodingError(_))
        ));

        let wrong_types = Value::Array(vec![
            Value::Integer(1.into()),
            Value::Text("Note".into()),
            Value::Bytes(vec![]),
        ]);
        assert!(matches!(
            registry.decode(&encode_canonical(&wrong_types)),
            Err(CoreError::DecodingError(_))
        ));

        assert!(registry.decode(&[]).is_err());
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let result = ActionRegistry::from_descriptors(&[NOTE_DESCRIPTOR, NOTE_DESCRIPTOR]);
        assert_eq!(
            result.unwrap_err(),
            RegistryError::Duplicate {
                category: "test".into(),
                name: "Note".into()
            }
        );
    }

    #[test]
    fn test_registry_introspection() {
        let registry = note_registry();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("test", "Note"));
        assert!(!registry.contains("test", "Other"));
        assert_eq!(registry.tags().collect::<Vec<_>>(), vec![("test", "Note")]);
    }
}

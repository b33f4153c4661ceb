//! Permission actions.

use std::sync::Arc;

use ciborium::value::Value;
use ows_ledger_core::canonical::{
    decode_value, encode_canonical, expect_bytes, expect_consumed, expect_map, int_map, take_field,
};
use ows_ledger_core::{Action, ActionDescriptor, ApplyError, CoreError, PubKey, ResourceId, ResourceManager};

const CATEGORY: &str = "permissions";
const ADD_USER: &str = "AddUser";

const KEY_PUBKEY: u64 = 0;

/// Registry entry for [`AddUser`].
pub const DESCRIPTOR: ActionDescriptor = ActionDescriptor {
    category: CATEGORY,
    name: ADD_USER,
    decode: decode_add_user,
};

/// Admit a user, identified by public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddUser {
    pub key: PubKey,
}

impl AddUser {
    pub fn new(key: PubKey) -> Self {
        Self { key }
    }
}

impl Action for AddUser {
    fn category(&self) -> &str {
        CATEGORY
    }

    fn name(&self) -> &str {
        ADD_USER
    }

    fn encode_attributes(&self) -> Vec<u8> {
        encode_canonical(&int_map(vec![(KEY_PUBKEY, Value::Bytes(self.key.0.to_vec()))]))
    }

    fn apply(
        &self,
        resources: &mut dyn ResourceManager,
        _next_id: &mut dyn FnMut() -> ResourceId,
    ) -> Result<(), ApplyError> {
        resources.add_user(self.key)
    }
}

fn decode_add_user(bytes: &[u8]) -> Result<Arc<dyn Action>, CoreError> {
    let malformed = |e: CoreError| CoreError::malformed(CATEGORY, ADD_USER, e.to_string());

    let mut map = expect_map(decode_value(bytes).map_err(malformed)?, "attributes").map_err(malformed)?;
    let key = take_field(&mut map, KEY_PUBKEY)
        .ok_or_else(|| CoreError::malformed(CATEGORY, ADD_USER, "missing key"))?;
    let key: [u8; 32] = expect_bytes(key, "key")
        .map_err(malformed)?
        .try_into()
        .map_err(|_| CoreError::malformed(CATEGORY, ADD_USER, "key must be 32 bytes"))?;
    let key = PubKey::from_bytes(key).map_err(malformed)?;
    expect_consumed(map, "attributes").map_err(malformed)?;

    Ok(Arc::new(AddUser { key }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ows_ledger_core::{encode_action, Keypair};

    #[derive(Default)]
    struct Users(Vec<PubKey>);

    impl ResourceManager for Users {
        fn add_user(&mut self, key: PubKey) -> Result<(), ApplyError> {
            self.0.push(key);
            Ok(())
        }
    }

    fn attributes(key: Vec<u8>) -> Vec<u8> {
        encode_canonical(&int_map(vec![(KEY_PUBKEY, Value::Bytes(key))]))
    }

    #[test]
    fn test_add_user_roundtrip() {
        let registry = crate::default_registry().unwrap();
        let user = AddUser::new(Keypair::generate().public_key());

        let bytes = encode_action(&user);
        let decoded = registry.decode(&bytes).unwrap();

        assert_eq!(decoded.category(), "permissions");
        assert_eq!(decoded.name(), "AddUser");
        assert_eq!(encode_action(decoded.as_ref()), bytes);
    }

    #[test]
    fn test_short_key_is_malformed() {
        assert!(matches!(
            decode_add_user(&attributes(vec![1; 31])),
            Err(CoreError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_missing_key_is_malformed() {
        let attrs = encode_canonical(&int_map(vec![]));
        assert!(matches!(
            decode_add_user(&attrs),
            Err(CoreError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_unknown_key_is_malformed() {
        let key = Keypair::from_seed(&[7; 32]).public_key();
        let attrs = encode_canonical(&int_map(vec![
            (KEY_PUBKEY, Value::Bytes(key.0.to_vec())),
            (1, Value::Bool(true)),
        ]));
        assert!(matches!(
            decode_add_user(&attrs),
            Err(CoreError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_task_only_manager_refuses_users() {
        struct TasksOnly;
        impl ResourceManager for TasksOnly {
            fn add_task(&mut self, _id: ResourceId, _runtime: &str, _handler: &str) -> Result<(), ApplyError> {
                Ok(())
            }
        }

        let key = Keypair::from_seed(&[7; 32]).public_key();
        let mut next_id = || -> ResourceId { unreachable!("AddUser allocates no ids") };

        assert!(matches!(
            AddUser::new(key).apply(&mut TasksOnly, &mut next_id),
            Err(ApplyError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_apply_adds_user_without_ids() {
        let key = Keypair::from_seed(&[7; 32]).public_key();
        let mut users = Users::default();
        let mut next_id = || -> ResourceId { unreachable!("AddUser allocates no ids") };

        AddUser::new(key).apply(&mut users, &mut next_id).unwrap();

        assert_eq!(users.0, vec![key]);
    }
}

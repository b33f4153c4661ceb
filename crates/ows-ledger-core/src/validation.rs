//! Chain validation: parent linkage plus an optional pluggable asset check.

use crate::change_set::ChangeSet;
use crate::error::ValidationError;
use crate::types::ChangeSetHash;

/// A deeper content check over a whole chain.
///
/// The details belong to the resource layer; the ledger only decides when
/// to run it.
pub trait AssetValidator: Send + Sync {
    /// Check the chain, reporting the first offending change set.
    fn validate_chain(&self, changes: &[ChangeSet]) -> Result<(), ValidationError>;
}

/// Validate a chain of change sets.
///
/// Checks, in order:
/// - the chain is non-empty
/// - `changes[0]` links to [`ChangeSetHash::ZERO`]
/// - `changes[i].parent == hash(changes[i - 1])` for every `i > 0`
/// - the asset check, when one is given
pub fn validate_chain(
    changes: &[ChangeSet],
    assets: Option<&dyn AssetValidator>,
) -> Result<(), ValidationError> {
    let genesis = changes.first().ok_or(ValidationError::EmptyChain)?;
    if !genesis.is_root() {
        return Err(ValidationError::GenesisHasParent(genesis.parent));
    }

    let mut expected = genesis.hash();
    for (index, cs) in changes.iter().enumerate().skip(1) {
        if cs.parent != expected {
            return Err(ValidationError::BrokenLink {
                index,
                expected,
                got: cs.parent,
            });
        }
        expected = cs.hash();
    }

    if let Some(assets) = assets {
        assets.validate_chain(changes)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::change_set;

    struct RejectAt(usize);

    impl AssetValidator for RejectAt {
        fn validate_chain(&self, changes: &[ChangeSet]) -> Result<(), ValidationError> {
            if changes.len() > self.0 {
                return Err(ValidationError::AssetIntegrity {
                    index: self.0,
                    reason: "rejected".into(),
                });
            }
            Ok(())
        }
    }

    fn chain(len: usize) -> Vec<ChangeSet> {
        let mut changes = vec![change_set(ChangeSetHash::ZERO, &["genesis"])];
        for i in 1..len {
            let parent = changes[i - 1].hash();
            changes.push(change_set(parent, &["step"]));
        }
        changes
    }

    #[test]
    fn test_valid_chain() {
        assert!(validate_chain(&chain(4), None).is_ok());
    }

    #[test]
    fn test_empty_chain() {
        assert_eq!(validate_chain(&[], None), Err(ValidationError::EmptyChain));
    }

    #[test]
    fn test_genesis_with_parent() {
        let parent = ChangeSetHash::from_bytes([1; 32]);
        let changes = vec![change_set(parent, &["genesis"])];
        assert_eq!(
            validate_chain(&changes, None),
            Err(ValidationError::GenesisHasParent(parent))
        );
    }

    #[test]
    fn test_broken_link_reports_first_violation() {
        let mut changes = chain(4);
        let expected = changes[1].hash();
        changes[2].parent = ChangeSetHash::from_bytes([0xee; 32]);
        changes[3].parent = ChangeSetHash::from_bytes([0xdd; 32]);

        assert_eq!(
            validate_chain(&changes, None),
            Err(ValidationError::BrokenLink {
                index: 2,
                expected,
                got: ChangeSetHash::from_bytes([0xee; 32]),
            })
        );
    }

    #[test]
    fn test_asset_check_only_when_requested() {
        let changes = chain(3);
        assert!(validate_chain(&changes, None).is_ok());
        assert!(matches!(
            validate_chain(&changes, Some(&RejectAt(1))),
            Err(ValidationError::AssetIntegrity { index: 1, .. })
        ));
    }
}

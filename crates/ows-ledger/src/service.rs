//! The ledger service: the boundary peers read from and propose to.
//!
//! One `RwLock` guards the ledger together with the resources replayed
//! from it. Reads share the lock; a proposal holds it exclusively from
//! validation until it is persisted, so no append interleaves with another.

use ows_ledger_core::{ChangeSet, ChangeSetHash, Ledger};
use ows_ledger_store::LedgerStore;
use serde_bytes::ByteBuf;
use tokio::sync::RwLock;

use crate::error::{LedgerError, Result, StartupError};
use crate::messages::{limits, RejectCode, SyncRequest, SyncResponse};
use crate::project::Project;
use crate::resources::{asset_validator, InMemoryResources};

struct NodeState {
    ledger: Ledger,
    resources: InMemoryResources,
}

/// Serves one project's ledger.
pub struct LedgerService<S: LedgerStore> {
    project: Project<S>,
    state: RwLock<NodeState>,
    validate_assets: bool,
}

impl<S: LedgerStore> LedgerService<S> {
    /// Load the project's ledger and replay it into fresh resources.
    pub async fn start(project: Project<S>, validate_assets: bool) -> std::result::Result<Self, StartupError> {
        let ledger = project
            .read_ledger(asset_validator(validate_assets))
            .await?;

        let mut resources = InMemoryResources::new();
        ledger.apply_all(&mut resources)?;

        tracing::info!(
            head = %ledger.head(),
            length = ledger.len(),
            tasks = resources.task_count(),
            users = resources.user_count(),
            "ledger service ready"
        );

        Ok(Self {
            project,
            state: RwLock::new(NodeState { ledger, resources }),
            validate_assets,
        })
    }

    pub fn project(&self) -> &Project<S> {
        &self.project
    }

    pub async fn head(&self) -> ChangeSetHash {
        self.state.read().await.ledger.head()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.ledger.len()
    }

    pub async fn hashes(&self) -> Vec<ChangeSetHash> {
        self.state.read().await.ledger.change_set_hashes()
    }

    pub async fn change_set(&self, hash: &ChangeSetHash) -> Option<ChangeSet> {
        self.state.read().await.ledger.get_change_set(hash).cloned()
    }

    pub async fn change_sets_after(&self, hash: &ChangeSetHash) -> Option<Vec<ChangeSet>> {
        self.state
            .read()
            .await
            .ledger
            .change_sets_after(hash)
            .map(<[ChangeSet]>::to_vec)
    }

    /// A copy of the current ledger.
    pub async fn ledger(&self) -> Ledger {
        self.state.read().await.ledger.clone()
    }

    /// A copy of the current resource state.
    pub async fn resources(&self) -> InMemoryResources {
        self.state.read().await.resources.clone()
    }

    /// Append a change set, persist the ledger, and apply it.
    ///
    /// On any error the ledger, the stored bytes and the resources are as
    /// they were before the call.
    pub async fn propose(&self, cs: ChangeSet) -> Result<ChangeSetHash> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let until = state.ledger.len() - 1;

        let head = state
            .ledger
            .append_change_set(cs, asset_validator(self.validate_assets))?;

        let mut resources = state.resources.clone();
        if let Err(e) = state.ledger.last().apply(&mut resources) {
            state.ledger.keep_change_sets(until);
            return Err(e.into());
        }

        if let Err(e) = self.project.write(&state.ledger).await {
            state.ledger.keep_change_sets(until);
            tracing::error!(error = %e, head = %state.ledger.head(), "persisting append failed, rolled back");
            return Err(e.into());
        }

        state.resources = resources;
        tracing::info!(head = %head, length = state.ledger.len(), "appended change set");
        Ok(head)
    }

    /// Answer one request.
    pub async fn handle(&self, request: SyncRequest) -> SyncResponse {
        match request {
            SyncRequest::Head => {
                let state = self.state.read().await;
                SyncResponse::Head {
                    head: state.ledger.head(),
                    length: state.ledger.len() as u64,
                }
            }
            SyncRequest::Hashes => SyncResponse::Hashes {
                hashes: self.hashes().await,
            },
            SyncRequest::GetChangeSet { hash } => match self.change_set(&hash).await {
                Some(cs) => SyncResponse::ChangeSet {
                    change_set: cs.encode(),
                },
                None => SyncResponse::NotFound { hash },
            },
            SyncRequest::ChangeSetsAfter { hash } => {
                let state = self.state.read().await;
                match state.ledger.change_sets_after(&hash) {
                    Some(after) => SyncResponse::ChangeSets {
                        change_sets: after
                            .iter()
                            .take(limits::MAX_CHANGE_SETS_PER_MESSAGE)
                            .map(|cs| ByteBuf::from(cs.encode()))
                            .collect(),
                        more: after.len() > limits::MAX_CHANGE_SETS_PER_MESSAGE,
                    },
                    None => SyncResponse::NotFound { hash },
                }
            }
            SyncRequest::Propose { change_set } => self.handle_proposal(&change_set).await,
        }
    }

    /// Answer one CBOR-encoded request with a CBOR-encoded response.
    pub async fn handle_bytes(&self, bytes: &[u8]) -> Vec<u8> {
        let response = match SyncRequest::from_bytes(bytes) {
            Ok(request) => self.handle(request).await,
            Err(e) => SyncResponse::Rejected {
                code: RejectCode::Malformed,
                message: e.to_string(),
            },
        };
        response.to_bytes()
    }

    async fn handle_proposal(&self, bytes: &[u8]) -> SyncResponse {
        let result = match ChangeSet::decode(bytes, self.project.registry()) {
            Ok(cs) => self.propose(cs).await,
            Err(e) => Err(LedgerError::from(e)),
        };

        match result {
            Ok(head) => SyncResponse::Accepted { head },
            Err(e) => {
                tracing::warn!(error = %e, "rejected proposal");
                SyncResponse::Rejected {
                    code: e.reject_code(),
                    message: e.to_string(),
                }
            }
        }
    }
}

//! # OWS Ledger
//!
//! The node-facing API for the OWS ledger: a per-project, append-only chain
//! of change sets bootstrapped from a shared genesis set.
//!
//! ## Overview
//!
//! - **Project**: the genesis set, its content-addressed store, and the
//!   registry that decodes its actions
//! - **Resources**: the state built by replaying every change set in order
//! - **Service**: the boundary peers read the chain from and propose
//!   extensions to
//!
//! ## Startup
//!
//! A node cannot run without a valid initial ledger. Every failure while
//! establishing it is a [`StartupError`]; failures on a later proposal are
//! [`LedgerError`]s and leave the ledger unchanged.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ows_ledger::{LedgerService, NodeConfig, Project};
//! use ows_ledger::actions::default_registry;
//!
//! async fn example() {
//!     let config = NodeConfig::from_env();
//!     let registry = default_registry().unwrap();
//!     let project = Project::open(&config, registry).unwrap();
//!     let service = LedgerService::start(project, config.validate_assets)
//!         .await
//!         .unwrap();
//!     println!("head {}", service.head().await);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `ows_ledger::core` - Core primitives (ChangeSet, Ledger, registry)
//! - `ows_ledger::store` - Ledger persistence
//! - `ows_ledger::actions` - Shipped action kinds

pub mod config;
pub mod error;
pub mod messages;
pub mod project;
pub mod resources;
pub mod service;

// Re-export component crates
pub use ows_ledger_actions as actions;
pub use ows_ledger_core as core;
pub use ows_ledger_store as store;

pub use config::NodeConfig;
pub use error::{LedgerError, Result, StartupError};
pub use messages::{RejectCode, SyncRequest, SyncResponse};
pub use project::Project;
pub use resources::{asset_validator, InMemoryResources, ReplayCheck, Task};
pub use service::LedgerService;

pub use ows_ledger_core::{ChangeSet, ChangeSetHash, GenesisSet, Ledger};

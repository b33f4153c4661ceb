//! # OWS Ledger Store
//!
//! Persistence for project ledgers. A ledger is stored as one opaque blob of
//! canonical bytes, addressed by the hash of the project's genesis set.
//!
//! ## Key Types
//!
//! - [`LedgerStore`] - The async trait for ledger persistence
//! - [`FileStore`] - On-disk layout `<home>/<compact(genesis hash)>/ledger`
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ows_ledger_store::{FileStore, LedgerStore};
//! use ows_ledger_core::ChangeSetHash;
//!
//! async fn example(genesis: ChangeSetHash, bytes: Vec<u8>) {
//!     let store = FileStore::new("/ows");
//!     store.write(&genesis, &bytes).await.unwrap();
//!     let stored = store.read(&genesis).await.unwrap();
//!     assert_eq!(stored, Some(bytes));
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Opaque blobs**: stores never decode; corruption is detected by the caller
//! - **Whole-file replace**: a write replaces the previous ledger atomically

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use file::{FileStore, LEDGER_FILE_NAME};
pub use memory::MemoryStore;
pub use traits::LedgerStore;

//! # OWS Ledger Testkit
//!
//! Testing utilities for the OWS ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a registry, genesis set and admin key, plus helpers that
//!   build valid chains on top of them
//! - **Generators**: Proptest strategies for property-based testing
//!
//! ## Test Fixtures
//!
//! ```rust
//! use ows_ledger_testkit::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let ledger = fixture.chain(3);
//! assert_eq!(ledger.len(), 3);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use ows_ledger_testkit::generators::{ledger_from_params, ChainParams};
//!
//! proptest! {
//!     #[test]
//!     fn generated_chains_validate(params: ChainParams) {
//!         prop_assert!(ledger_from_params(&params).validate_all(None).is_ok());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{add_task, add_user, encode_unchecked, TestFixture};
pub use generators::{ledger_from_params, ChainParams};

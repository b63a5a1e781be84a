//! # credreg-state — Registry Rule Engines
//!
//! Implements the state-transition rules of the credential registry as
//! deterministic functions over a keyed record store. Each function takes the
//! store, a [`CallContext`](credreg_core::CallContext) (caller and height),
//! and its arguments, and either mutates the store or returns a
//! [`LedgerError`](credreg_core::LedgerError) having written nothing.
//!
//! ## Registries
//!
//! - **Institution** (`institution.rs`): register, then contract-owner
//!   verification.
//! - **Student** (`student.rs`): register, then student-authority
//!   verification with height and authority provenance.
//! - **Achievement** (`achievement.rs`): issuance by the owner of a verified
//!   institution, revocation by the same owner.
//!
//! ## Atomicity
//!
//! Engines run every check before their first write. [`Ledger`] additionally
//! runs each call inside a staging [`Transaction`] committed only on success.

pub mod achievement;
pub mod institution;
pub mod ledger;
pub mod store;
pub mod student;

pub use achievement::{AchievementRecord, IssueRequest};
pub use institution::InstitutionRecord;
pub use ledger::{Ledger, LedgerSnapshot};
pub use store::{MemoryStore, Record, RecordStore, StoreName, Transaction, TypedStore};
pub use student::StudentRecord;

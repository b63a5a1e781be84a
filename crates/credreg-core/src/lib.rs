//! # credreg-core — Foundational Types for the Credential Registry
//!
//! Every other crate in the workspace depends on `credreg-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `Principal`, `InstitutionId`,
//!    `StudentId`, `AchievementId` are distinct types with validated
//!    constructors. An institution key cannot be passed where a student key
//!    is expected.
//!
//! 2. **Environment facts are explicit.** The caller identity and the current
//!    block height arrive together as a [`CallContext`]. Nothing in the
//!    workspace reads a clock or a global.
//!
//! 3. **One closed error taxonomy.** [`LedgerError`] has exactly four kinds,
//!    shared by all three registries.
//!
//! 4. **Designated principals are configuration.** The contract owner and the
//!    student authority live in [`DeploymentConfig`], injected at ledger
//!    construction.
//!
//! 5. **`sha256_digest()` accepts only `&CanonicalBytes`.** Store snapshots
//!    are hashed through the JCS pipeline so equal states produce equal digests.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `credreg-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod config;
pub mod context;
pub mod digest;
pub mod error;
pub mod identity;

pub use canonical::CanonicalBytes;
pub use config::{DeploymentConfig, RepeatPolicy};
pub use context::{CallContext, Height};
pub use digest::{sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, ConfigError, IdentifierError, LedgerError};
pub use identity::{AchievementId, InstitutionId, Principal, StudentId, MAX_IDENTIFIER_LEN};

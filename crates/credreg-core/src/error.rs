//! # Error Types
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - [`LedgerError`] is the closed business taxonomy returned by every
//!   registry operation. Four kinds, each with the numeric code the ledger
//!   contract exposes to callers.
//! - Identifier, configuration and canonicalization failures are separate
//!   types. They occur before a call reaches the rule engines.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Business-rule rejection shared by the institution, student and
/// achievement registries.
///
/// A rejected call never mutates the store.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerError {
    /// The caller lacks the role or principal required for this mutation.
    #[error("caller is not authorized for this operation")]
    Unauthorized,

    /// A create-style operation targeted an occupied key.
    #[error("a record already exists under this key")]
    AlreadyExists,

    /// The target key, or a record it references, has no record.
    #[error("no record found")]
    NotFound,

    /// The referenced institution exists but has not been verified.
    #[error("institution is not verified")]
    InvalidInstitution,
}

impl LedgerError {
    /// All kinds, in code order.
    pub const ALL: [LedgerError; 4] = [
        Self::Unauthorized,
        Self::AlreadyExists,
        Self::NotFound,
        Self::InvalidInstitution,
    ];

    /// The numeric error code returned by the ledger contract (`u1`..`u4`).
    pub fn code(&self) -> u32 {
        match self {
            Self::Unauthorized => 1,
            Self::AlreadyExists => 2,
            Self::NotFound => 3,
            Self::InvalidInstitution => 4,
        }
    }

    /// Map a contract error code back to its kind.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.code() == code)
    }

    /// Stable kind name, as printed by the CLI and recorded in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized",
            Self::AlreadyExists => "AlreadyExists",
            Self::NotFound => "NotFound",
            Self::InvalidInstitution => "InvalidInstitution",
        }
    }
}

/// A caller-supplied identifier failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The identifier is the empty string.
    #[error("{kind} must not be empty")]
    Empty {
        /// Identifier namespace (e.g. "institution id").
        kind: &'static str,
    },

    /// The identifier exceeds the maximum length.
    #[error("{kind} is {len} bytes, maximum is {max}")]
    TooLong {
        /// Identifier namespace.
        kind: &'static str,
        /// Actual length in bytes.
        len: usize,
        /// Maximum permitted length in bytes.
        max: usize,
    },

    /// The identifier has surrounding whitespace or control characters.
    #[error("{kind} {value:?} contains whitespace padding or control characters")]
    Malformed {
        /// Identifier namespace.
        kind: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Deployment configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The YAML document is malformed or has the wrong shape.
    /// Principals that fail identifier validation surface here too.
    #[error("invalid config document: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

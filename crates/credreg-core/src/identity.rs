//! # Identity Newtypes
//!
//! Newtype wrappers for the principals and record keys of the registry.
//! These prevent accidental identifier confusion: you cannot look up a
//! `StudentId` in the institution store.
//!
//! All four types are opaque strings supplied by the caller. Validation only
//! rejects values no ledger would accept as a key: empty, oversized, padded
//! with whitespace, or containing control characters.

use serde::{Deserialize, Serialize};

use crate::error::IdentifierError;

/// Maximum identifier length in bytes.
pub const MAX_IDENTIFIER_LEN: usize = 128;

fn validate(kind: &'static str, value: &str) -> Result<(), IdentifierError> {
    if value.is_empty() {
        return Err(IdentifierError::Empty { kind });
    }
    if value.len() > MAX_IDENTIFIER_LEN {
        return Err(IdentifierError::TooLong {
            kind,
            len: value.len(),
            max: MAX_IDENTIFIER_LEN,
        });
    }
    if value.trim() != value || value.chars().any(char::is_control) {
        return Err(IdentifierError::Malformed {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap a caller-supplied value.
            pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
                let value = value.into();
                validate($kind, &value)?;
                Ok(Self(value))
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_identifier!(
    /// An asserted caller identity (transaction sender).
    ///
    /// Authentication happens outside this crate; a `Principal` is compared,
    /// never verified.
    Principal,
    "principal"
);

string_identifier!(
    /// Key of an institution record.
    InstitutionId,
    "institution id"
);

string_identifier!(
    /// Key of a student record. Achievements reference it without an
    /// existence check.
    StudentId,
    "student id"
);

string_identifier!(
    /// Key of an achievement record.
    AchievementId,
    "achievement id"
);

//! # Call Context
//!
//! The two facts the environment supplies with every call: who is calling,
//! and at what block height. The registry never authenticates the caller and
//! never reads a clock; both values are taken as asserted.

use serde::{Deserialize, Serialize};

use crate::identity::Principal;

/// A block height. Used in place of a wall-clock timestamp for issuance and
/// verification provenance.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Height(pub u64);

impl Height {
    /// The height immediately after this one, saturating at `u64::MAX`.
    pub fn next(&self) -> Height {
        Height(self.0.saturating_add(1))
    }
}

impl From<u64> for Height {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Height {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller identity and current height for a single registry call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// The asserted transaction sender.
    pub caller: Principal,
    /// The height at which the call is applied.
    pub height: Height,
}

impl CallContext {
    /// Bundle a caller and a height.
    pub fn new(caller: Principal, height: impl Into<Height>) -> Self {
        Self {
            caller,
            height: height.into(),
        }
    }

    /// Whether the caller is exactly `principal`.
    pub fn is(&self, principal: &Principal) -> bool {
        &self.caller == principal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_next_saturates() {
        assert_eq!(Height(7).next(), Height(8));
        assert_eq!(Height(u64::MAX).next(), Height(u64::MAX));
    }

    #[test]
    fn height_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Height(123456)).unwrap(), "123456");
    }

    #[test]
    fn context_caller_match() {
        let alice = Principal::new("alice").unwrap();
        let bob = Principal::new("bob").unwrap();
        let ctx = CallContext::new(alice.clone(), 10);
        assert!(ctx.is(&alice));
        assert!(!ctx.is(&bob));
        assert_eq!(ctx.height, Height(10));
    }
}

//! # Deployment Configuration
//!
//! The designated principals of a deployment and the behaviour of repeated
//! one-way transitions. A ledger receives its configuration at construction
//! and never changes it afterwards.
//!
//! ## YAML shape
//!
//! ```yaml
//! contract_owner: ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG
//! student_authority: ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG
//! reverify_policy: accept   # optional, default accept
//! rerevoke_policy: accept   # optional, default accept
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::identity::Principal;

/// What a one-way transition does when the record is already in its target
/// state (re-verifying a verified institution or student, re-revoking a
/// revoked achievement).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatPolicy {
    /// Succeed without changing the record.
    #[default]
    Accept,
    /// Fail with `LedgerError::AlreadyExists`.
    Reject,
}

/// Principals and policies fixed for the lifetime of a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// The only principal allowed to verify institutions.
    pub contract_owner: Principal,
    /// The only principal allowed to verify students. May equal
    /// `contract_owner`; the two roles are checked independently.
    pub student_authority: Principal,
    /// Behaviour of `verify_institution` / `verify_student` on a verified record.
    #[serde(default)]
    pub reverify_policy: RepeatPolicy,
    /// Behaviour of `revoke_achievement` on a revoked record.
    #[serde(default)]
    pub rerevoke_policy: RepeatPolicy,
}

impl DeploymentConfig {
    /// A deployment with the given principals and default (accepting) policies.
    pub fn new(contract_owner: Principal, student_authority: Principal) -> Self {
        Self {
            contract_owner,
            student_authority,
            reverify_policy: RepeatPolicy::Accept,
            rerevoke_policy: RepeatPolicy::Accept,
        }
    }

    /// A deployment where one principal holds both roles.
    pub fn single_authority(principal: Principal) -> Self {
        Self::new(principal.clone(), principal)
    }

    /// Set both repeat policies.
    pub fn with_repeat_policy(mut self, policy: RepeatPolicy) -> Self {
        self.reverify_policy = policy;
        self.rerevoke_policy = policy;
        self
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load and parse a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }
}

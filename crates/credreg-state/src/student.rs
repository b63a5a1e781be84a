//! # Student Registry
//!
//! Students register themselves; the deployment's student authority verifies
//! them. Verification records the height and the verifying principal.
//!
//! ```text
//! (absent) ──register──▶ Unverified ──verify (student authority)──▶ Verified { height, authority }
//! ```
//!
//! Unlike institution verification, `verify` checks the record before the
//! caller.

use serde::{Deserialize, Serialize};

use credreg_core::{
    CallContext, DeploymentConfig, Height, LedgerError, Principal, RepeatPolicy, StudentId,
};

use crate::store::{RecordStore, StoreName, TypedStore};

/// A student known to the registry.
///
/// `verification_height` and `verification_authority` are both `None` until
/// `verified` is set, then both `Some` and never changed again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    /// Principal that registered the student.
    pub owner: Principal,
    /// Set by the student authority; never cleared.
    pub verified: bool,
    /// Height of the verifying call.
    pub verification_height: Option<Height>,
    /// Principal that verified the student.
    pub verification_authority: Option<Principal>,
}

impl StudentRecord {
    fn unverified(owner: Principal) -> Self {
        Self {
            owner,
            verified: false,
            verification_height: None,
            verification_authority: None,
        }
    }
}

/// Register `id` with the caller as owner.
///
/// # Errors
///
/// `AlreadyExists` if `id` is taken.
pub fn register<S: RecordStore + ?Sized>(
    store: &mut S,
    ctx: &CallContext,
    id: &StudentId,
) -> Result<(), LedgerError> {
    if store.contains(StoreName::Students, id.as_str()) {
        return Err(LedgerError::AlreadyExists);
    }
    store.put_student(id, StudentRecord::unverified(ctx.caller.clone()));
    tracing::debug!(student = %id, owner = %ctx.caller, "student registered");
    Ok(())
}

/// Mark `id` verified at the current height, recording the caller as the
/// verifying authority.
///
/// # Errors
///
/// `NotFound` if `id` is absent, then `Unauthorized` unless the caller is the
/// student authority. With [`RepeatPolicy::Reject`], `AlreadyExists` if the
/// student is already verified; with `Accept` the original provenance is kept.
pub fn verify<S: RecordStore + ?Sized>(
    store: &mut S,
    ctx: &CallContext,
    config: &DeploymentConfig,
    id: &StudentId,
) -> Result<(), LedgerError> {
    let mut record = store.student(id).ok_or(LedgerError::NotFound)?;
    if !ctx.is(&config.student_authority) {
        return Err(LedgerError::Unauthorized);
    }
    if record.verified {
        return match config.reverify_policy {
            RepeatPolicy::Accept => Ok(()),
            RepeatPolicy::Reject => Err(LedgerError::AlreadyExists),
        };
    }
    record.verified = true;
    record.verification_height = Some(ctx.height);
    record.verification_authority = Some(ctx.caller.clone());
    store.put_student(id, record);
    tracing::debug!(student = %id, height = %ctx.height, authority = %ctx.caller, "student verified");
    Ok(())
}

/// Look up a student.
pub fn get_info<S: RecordStore + ?Sized>(store: &S, id: &StudentId) -> Option<StudentRecord> {
    store.student(id)
}

/// `true` only for a registered, verified student.
pub fn is_verified<S: RecordStore + ?Sized>(store: &S, id: &StudentId) -> bool {
    store.student(id).is_some_and(|r| r.verified)
}

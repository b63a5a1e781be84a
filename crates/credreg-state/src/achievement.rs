//! # Achievement Ledger
//!
//! Verified institutions issue achievement records to students and may later
//! revoke them. A record never changes after issuance except for its
//! `revoked` flag, which only goes from `false` to `true`.
//!
//! ## Issuance checks (first failure wins)
//!
//! 1. `AlreadyExists`: the achievement id is taken.
//! 2. `NotFound`: the institution is not registered.
//! 3. `InvalidInstitution`: the institution is not verified.
//! 4. `Unauthorized`: the caller does not own the institution.
//!
//! The student id is stored as given. It is not checked against the student
//! registry, so achievements may predate student registration.
//!
//! ## Revocation checks
//!
//! 1. `NotFound`: the achievement does not exist.
//! 2. `NotFound`: its institution no longer resolves.
//! 3. `Unauthorized`: the caller does not own the institution.
//!
//! Revocation does not require the institution to still be verified.

use serde::{Deserialize, Serialize};

use credreg_core::{
    AchievementId, CallContext, DeploymentConfig, Height, InstitutionId, LedgerError, RepeatPolicy,
    StudentId,
};

use crate::store::{RecordStore, StoreName, TypedStore};

/// A credential issued by an institution to a student reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementRecord {
    /// Recipient. Not required to be registered.
    pub student_id: StudentId,
    /// Issuing institution.
    pub institution_id: InstitutionId,
    /// Category, e.g. "degree" or "certificate".
    pub achievement_type: String,
    /// Title of the achievement.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Height of the issuing call.
    pub issue_height: Height,
    /// Optional pointer to off-ledger metadata.
    pub metadata_uri: Option<String>,
    /// Set on revocation; never cleared.
    pub revoked: bool,
}

impl AchievementRecord {
    /// Whether the achievement is currently valid (not revoked).
    pub fn is_valid(&self) -> bool {
        !self.revoked
    }
}

/// Arguments of an issuance call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    /// Key of the new record.
    pub achievement_id: AchievementId,
    /// Recipient.
    pub student_id: StudentId,
    /// Issuing institution; must be registered, verified, and owned by the caller.
    pub institution_id: InstitutionId,
    /// Category.
    pub achievement_type: String,
    /// Title.
    pub name: String,
    /// Description.
    pub description: String,
    /// Optional metadata pointer.
    #[serde(default)]
    pub metadata_uri: Option<String>,
}

/// Issue an achievement at the current height.
///
/// # Errors
///
/// See the module documentation for the check order.
pub fn issue<S: RecordStore + ?Sized>(
    store: &mut S,
    ctx: &CallContext,
    request: &IssueRequest,
) -> Result<(), LedgerError> {
    if store.contains(StoreName::Achievements, request.achievement_id.as_str()) {
        return Err(LedgerError::AlreadyExists);
    }
    let institution = store
        .institution(&request.institution_id)
        .ok_or(LedgerError::NotFound)?;
    if !institution.verified {
        return Err(LedgerError::InvalidInstitution);
    }
    if !institution.is_owned_by(&ctx.caller) {
        return Err(LedgerError::Unauthorized);
    }

    store.put_achievement(
        &request.achievement_id,
        AchievementRecord {
            student_id: request.student_id.clone(),
            institution_id: request.institution_id.clone(),
            achievement_type: request.achievement_type.clone(),
            name: request.name.clone(),
            description: request.description.clone(),
            issue_height: ctx.height,
            metadata_uri: request.metadata_uri.clone(),
            revoked: false,
        },
    );
    tracing::debug!(
        achievement = %request.achievement_id,
        institution = %request.institution_id,
        student = %request.student_id,
        height = %ctx.height,
        "achievement issued"
    );
    Ok(())
}

/// Revoke an achievement.
///
/// # Errors
///
/// See the module documentation for the check order. With
/// [`RepeatPolicy::Reject`], `AlreadyExists` if the achievement is already
/// revoked.
pub fn revoke<S: RecordStore + ?Sized>(
    store: &mut S,
    ctx: &CallContext,
    config: &DeploymentConfig,
    id: &AchievementId,
) -> Result<(), LedgerError> {
    let mut record = store.achievement(id).ok_or(LedgerError::NotFound)?;
    let institution = match store.institution(&record.institution_id) {
        Some(institution) => institution,
        None => {
            tracing::warn!(
                achievement = %id,
                institution = %record.institution_id,
                "achievement references an unknown institution"
            );
            return Err(LedgerError::NotFound);
        }
    };
    if !institution.is_owned_by(&ctx.caller) {
        return Err(LedgerError::Unauthorized);
    }
    if record.revoked {
        return match config.rerevoke_policy {
            RepeatPolicy::Accept => Ok(()),
            RepeatPolicy::Reject => Err(LedgerError::AlreadyExists),
        };
    }
    record.revoked = true;
    store.put_achievement(id, record);
    tracing::debug!(achievement = %id, height = %ctx.height, "achievement revoked");
    Ok(())
}

/// Look up an achievement.
pub fn get<S: RecordStore + ?Sized>(store: &S, id: &AchievementId) -> Option<AchievementRecord> {
    store.achievement(id)
}

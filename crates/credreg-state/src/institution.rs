//! # Institution Registry
//!
//! Institutions register themselves; the deployment's contract owner
//! verifies them. Only verified institutions may issue achievements.
//!
//! ## Lifecycle
//!
//! ```text
//! (absent) ──register──▶ Unverified ──verify (contract owner)──▶ Verified
//! ```
//!
//! `owner` is fixed at registration. `verified` never reverts.
//!
//! ## Check order
//!
//! `verify` checks the caller before the record: a non-owner learns nothing
//! about which institution ids exist.

use serde::{Deserialize, Serialize};

use credreg_core::{
    CallContext, DeploymentConfig, InstitutionId, LedgerError, Principal, RepeatPolicy,
};

use crate::store::{RecordStore, StoreName, TypedStore};

/// An educational institution known to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionRecord {
    /// Principal that registered the institution. Issues and revokes its
    /// achievements.
    pub owner: Principal,
    /// Display name.
    pub name: String,
    /// Set by the contract owner; never cleared.
    pub verified: bool,
}

impl InstitutionRecord {
    /// Whether `principal` owns this institution.
    pub fn is_owned_by(&self, principal: &Principal) -> bool {
        &self.owner == principal
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
    id: &InstitutionId,
    name: &str,
) -> Result<(), LedgerError> {
    if store.contains(StoreName::Institutions, id.as_str()) {
        return Err(LedgerError::AlreadyExists);
    }
    store.put_institution(
        id,
        InstitutionRecord {
            owner: ctx.caller.clone(),
            name: name.to_string(),
            verified: false,
        },
    );
    tracing::debug!(institution = %id, owner = %ctx.caller, "institution registered");
    Ok(())
}

/// Mark `id` verified.
///
/// # Errors
///
/// `Unauthorized` unless the caller is the contract owner, then `NotFound`
/// if `id` is absent. With [`RepeatPolicy::Reject`], `AlreadyExists` if the
/// institution is already verified.
pub fn verify<S: RecordStore + ?Sized>(
    store: &mut S,
    ctx: &CallContext,
    config: &DeploymentConfig,
    id: &InstitutionId,
) -> Result<(), LedgerError> {
    if !ctx.is(&config.contract_owner) {
        return Err(LedgerError::Unauthorized);
    }
    let mut record = store.institution(id).ok_or(LedgerError::NotFound)?;
    if record.verified {
        return match config.reverify_policy {
            RepeatPolicy::Accept => Ok(()),
            RepeatPolicy::Reject => Err(LedgerError::AlreadyExists),
        };
    }
    record.verified = true;
    store.put_institution(id, record);
    tracing::debug!(institution = %id, "institution verified");
    Ok(())
}

/// Look up an institution.
pub fn get_info<S: RecordStore + ?Sized>(store: &S, id: &InstitutionId) -> Option<InstitutionRecord> {
    store.institution(id)
}

/// `true` only for a registered, verified institution.
pub fn is_verified<S: RecordStore + ?Sized>(store: &S, id: &InstitutionId) -> bool {
    store.institution(id).is_some_and(|r| r.verified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn p(s: &str) -> Principal {
        Principal::new(s).unwrap()
    }

    fn id(s: &str) -> InstitutionId {
        InstitutionId::new(s).unwrap()
    }

    fn config() -> DeploymentConfig {
        DeploymentConfig::new(p("owner"), p("registrar"))
    }

    fn as_caller(name: &str) -> CallContext {
        CallContext::new(p(name), 100)
    }

    #[test]
    fn register_creates_unverified_record_owned_by_caller() {
        let mut store = MemoryStore::new();
        register(&mut store, &as_caller("alice"), &id("inst-456"), "New University").unwrap();
        let record = get_info(&store, &id("inst-456")).unwrap();
        assert_eq!(record.owner, p("alice"));
        assert_eq!(record.name, "New University");
        assert!(!record.verified);
        assert!(record.is_owned_by(&p("alice")));
    }

    #[test]
    fn register_twice_is_already_exists_and_keeps_first() {
        let mut store = MemoryStore::new();
        register(&mut store, &as_caller("alice"), &id("inst-456"), "New University").unwrap();
        let err = register(&mut store, &as_caller("bob"), &id("inst-456"), "Another University")
            .unwrap_err();
        assert_eq!(err, LedgerError::AlreadyExists);
        let record = get_info(&store, &id("inst-456")).unwrap();
        assert_eq!(record.owner, p("alice"));
        assert_eq!(record.name, "New University");
    }

    #[test]
    fn verify_by_owner_sets_flag_only() {
        let mut store = MemoryStore::new();
        register(&mut store, &as_caller("alice"), &id("inst-456"), "New University").unwrap();
        verify(&mut store, &as_caller("owner"), &config(), &id("inst-456")).unwrap();
        let record = get_info(&store, &id("inst-456")).unwrap();
        assert!(record.verified);
        assert_eq!(record.owner, p("alice"));
        assert_eq!(record.name, "New University");
    }

    #[test]
    fn verify_by_non_owner_is_unauthorized_even_when_missing() {
        let mut store = MemoryStore::new();
        assert_eq!(
            verify(&mut store, &as_caller("alice"), &config(), &id("ghost")),
            Err(LedgerError::Unauthorized)
        );
        register(&mut store, &as_caller("alice"), &id("inst-456"), "U").unwrap();
        assert_eq!(
            verify(&mut store, &as_caller("alice"), &config(), &id("inst-456")),
            Err(LedgerError::Unauthorized)
        );
        assert!(!is_verified(&store, &id("inst-456")));
    }

    #[test]
    fn student_authority_cannot_verify_institutions() {
        let mut store = MemoryStore::new();
        register(&mut store, &as_caller("alice"), &id("inst-456"), "U").unwrap();
        assert_eq!(
            verify(&mut store, &as_caller("registrar"), &config(), &id("inst-456")),
            Err(LedgerError::Unauthorized)
        );
    }

    #[test]
    fn verify_missing_by_owner_is_not_found() {
        let mut store = MemoryStore::new();
        assert_eq!(
            verify(&mut store, &as_caller("owner"), &config(), &id("non-existent-institution")),
            Err(LedgerError::NotFound)
        );
    }

    #[test]
    fn reverify_accept_is_noop() {
        let mut store = MemoryStore::new();
        register(&mut store, &as_caller("alice"), &id("inst-456"), "U").unwrap();
        verify(&mut store, &as_caller("owner"), &config(), &id("inst-456")).unwrap();
        let before = store.digest().unwrap();
        verify(&mut store, &as_caller("owner"), &config(), &id("inst-456")).unwrap();
        assert_eq!(store.digest().unwrap(), before);
    }

    #[test]
    fn reverify_reject_is_already_exists() {
        let mut store = MemoryStore::new();
        let cfg = config().with_repeat_policy(RepeatPolicy::Reject);
        register(&mut store, &as_caller("alice"), &id("inst-456"), "U").unwrap();
        verify(&mut store, &as_caller("owner"), &cfg, &id("inst-456")).unwrap();
        assert_eq!(
            verify(&mut store, &as_caller("owner"), &cfg, &id("inst-456")),
            Err(LedgerError::AlreadyExists)
        );
        assert!(is_verified(&store, &id("inst-456")));
    }

    #[test]
    fn is_verified_is_false_for_missing_and_unverified() {
        let mut store = MemoryStore::new();
        assert!(!is_verified(&store, &id("inst-456")));
        register(&mut store, &as_caller("alice"), &id("inst-456"), "U").unwrap();
        assert!(!is_verified(&store, &id("inst-456")));
        verify(&mut store, &as_caller("owner"), &config(), &id("inst-456")).unwrap();
        assert!(is_verified(&store, &id("inst-456")));
    }

    #[test]
    fn record_json_uses_ledger_field_names() {
        let record = InstitutionRecord {
            owner: p("alice"),
            name: "Test University".to_string(),
            verified: true,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"owner": "alice", "name": "Test University", "verified": true})
        );
    }
}

//! # Ledger Facade
//!
//! [`Ledger`] binds a record store to a [`DeploymentConfig`] and exposes the
//! registry's entry points. Every mutating call runs inside a
//! [`Transaction`]; the staged writes reach the store only when the rule
//! engine returns `Ok`. A rejected call leaves the store, and the ledger's
//! height watermark, exactly as they were.
//!
//! The environment owns call ordering. The ledger remembers the highest
//! height it has committed at and logs a warning when a call arrives with a
//! lower one, but applies it anyway.

use serde::{Deserialize, Serialize};

use credreg_core::{
    AchievementId, CallContext, DeploymentConfig, Height, InstitutionId, LedgerError, StudentId,
};

use crate::achievement::{self, AchievementRecord, IssueRequest};
use crate::institution::{self, InstitutionRecord};
use crate::store::{MemoryStore, RecordStore, Transaction};
use crate::student::{self, StudentRecord};

/// The credential registry: institution and student registries plus the
/// achievement ledger, over one store.
#[derive(Debug, Clone)]
pub struct Ledger<S: RecordStore = MemoryStore> {
    store: S,
    config: DeploymentConfig,
    last_height: Option<Height>,
}

/// Persistable state of an in-memory ledger, including the deployment
/// config it was created under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Principals and policies fixed at deployment.
    pub config: DeploymentConfig,
    /// Highest height committed so far.
    #[serde(default)]
    pub last_height: Option<Height>,
    /// All records.
    #[serde(default)]
    pub store: MemoryStore,
}

impl Ledger<MemoryStore> {
    /// An empty in-memory ledger.
    pub fn new(config: DeploymentConfig) -> Self {
        Self::with_store(MemoryStore::new(), config)
    }

    /// Restore a ledger from a snapshot, under the config it recorded.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            store: snapshot.store,
            config: snapshot.config,
            last_height: snapshot.last_height,
        }
    }

    /// Capture the ledger's state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            config: self.config.clone(),
            last_height: self.last_height,
            store: self.store.clone(),
        }
    }
}

impl<S: RecordStore> Ledger<S> {
    /// A ledger over an existing store.
    pub fn with_store(store: S, config: DeploymentConfig) -> Self {
        Self {
            store,
            config,
            last_height: None,
        }
    }

    /// The deployment configuration.
    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the ledger, returning its store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Highest height at which a call has committed.
    pub fn last_height(&self) -> Option<Height> {
        self.last_height
    }

    // ── Institution registry ─────────────────────────────────────────

    /// Register an institution owned by the caller.
    pub fn register_institution(
        &mut self,
        ctx: &CallContext,
        id: &InstitutionId,
        name: &str,
    ) -> Result<(), LedgerError> {
        self.apply("register_institution", ctx, |tx, _| {
            institution::register(tx, ctx, id, name)
        })
    }

    /// Verify an institution. Contract owner only.
    pub fn verify_institution(
        &mut self,
        ctx: &CallContext,
        id: &InstitutionId,
    ) -> Result<(), LedgerError> {
        self.apply("verify_institution", ctx, |tx, config| {
            institution::verify(tx, ctx, config, id)
        })
    }

    /// Look up an institution.
    pub fn get_institution_info(&self, id: &InstitutionId) -> Option<InstitutionRecord> {
        institution::get_info(&self.store, id)
    }

    /// Whether an institution is registered and verified.
    pub fn is_institution_verified(&self, id: &InstitutionId) -> bool {
        institution::is_verified(&self.store, id)
    }

    // ── Student registry ─────────────────────────────────────────────

    /// Register a student owned by the caller.
    pub fn register_student(&mut self, ctx: &CallContext, id: &StudentId) -> Result<(), LedgerError> {
        self.apply("register_student", ctx, |tx, _| student::register(tx, ctx, id))
    }

    /// Verify a student. Student authority only.
    pub fn verify_student(&mut self, ctx: &CallContext, id: &StudentId) -> Result<(), LedgerError> {
        self.apply("verify_student", ctx, |tx, config| {
            student::verify(tx, ctx, config, id)
        })
    }

    /// Look up a student.
    pub fn get_student_info(&self, id: &StudentId) -> Option<StudentRecord> {
        student::get_info(&self.store, id)
    }

    /// Whether a student is registered and verified.
    pub fn is_student_verified(&self, id: &StudentId) -> bool {
        student::is_verified(&self.store, id)
    }

    // ── Achievement ledger ───────────────────────────────────────────

    /// Issue an achievement from an institution the caller owns.
    pub fn issue_achievement(
        &mut self,
        ctx: &CallContext,
        request: &IssueRequest,
    ) -> Result<(), LedgerError> {
        self.apply("issue_achievement", ctx, |tx, _| {
            achievement::issue(tx, ctx, request)
        })
    }

    /// Revoke an achievement issued by an institution the caller owns.
    pub fn revoke_achievement(
        &mut self,
        ctx: &CallContext,
        id: &AchievementId,
    ) -> Result<(), LedgerError> {
        self.apply("revoke_achievement", ctx, |tx, config| {
            achievement::revoke(tx, ctx, config, id)
        })
    }

    /// Look up an achievement.
    pub fn get_achievement(&self, id: &AchievementId) -> Option<AchievementRecord> {
        achievement::get(&self.store, id)
    }

    /// Run one mutating operation atomically.
    fn apply<F>(&mut self, op: &'static str, ctx: &CallContext, f: F) -> Result<(), LedgerError>
    where
        F: FnOnce(&mut Transaction<'_, S>, &DeploymentConfig) -> Result<(), LedgerError>,
    {
        if let Some(last) = self.last_height {
            if ctx.height < last {
                tracing::warn!(
                    op,
                    height = %ctx.height,
                    last = %last,
                    "call height is below the last committed height"
                );
            }
        }

        let mut tx = Transaction::begin(&mut self.store);
        match f(&mut tx, &self.config) {
            Ok(()) => {
                let writes = tx.commit();
                self.last_height = Some(self.last_height.map_or(ctx.height, |h| h.max(ctx.height)));
                tracing::info!(op, caller = %ctx.caller, height = %ctx.height, writes, "committed");
                Ok(())
            }
            Err(err) => {
                tx.rollback();
                tracing::warn!(
                    op,
                    caller = %ctx.caller,
                    height = %ctx.height,
                    error = err.kind(),
                    code = err.code(),
                    "rejected"
                );
                Err(err)
            }
        }
    }
}

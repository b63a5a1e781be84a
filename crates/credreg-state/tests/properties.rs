//! # Registry Properties
//!
//! Randomized call sequences against the `Ledger` facade. Every call either
//! commits or leaves the store digest untouched, and one-way flags never
//! revert.

use proptest::prelude::*;

use credreg_core::{
    AchievementId, CallContext, DeploymentConfig, InstitutionId, Principal, StudentId,
};
use credreg_state::{IssueRequest, Ledger};

const PRINCIPALS: [&str; 4] = ["owner", "registrar", "uni-a", "uni-b"];
const KEYS: [&str; 3] = ["k1", "k2", "k3"];

#[derive(Debug, Clone)]
enum Op {
    RegisterInstitution(usize, usize),
    VerifyInstitution(usize, usize),
    RegisterStudent(usize, usize),
    VerifyStudent(usize, usize),
    Issue(usize, usize, usize),
    Revoke(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    let who = 0..PRINCIPALS.len();
    let key = 0..KEYS.len();
    prop_oneof![
        (who.clone(), key.clone()).prop_map(|(w, k)| Op::RegisterInstitution(w, k)),
        (who.clone(), key.clone()).prop_map(|(w, k)| Op::VerifyInstitution(w, k)),
        (who.clone(), key.clone()).prop_map(|(w, k)| Op::RegisterStudent(w, k)),
        (who.clone(), key.clone()).prop_map(|(w, k)| Op::VerifyStudent(w, k)),
        (who.clone(), key.clone(), key.clone()).prop_map(|(w, a, i)| Op::Issue(w, a, i)),
        (who, key).prop_map(|(w, k)| Op::Revoke(w, k)),
    ]
}

fn p(i: usize) -> Principal {
    Principal::new(PRINCIPALS[i]).unwrap()
}

fn apply(l: &mut Ledger, op: &Op, height: u64) -> bool {
    let ctx = |w: usize| CallContext::new(p(w), height);
    let result = match op {
        Op::RegisterInstitution(w, k) => {
            l.register_institution(&ctx(*w), &InstitutionId::new(KEYS[*k]).unwrap(), "Institution")
        }
        Op::VerifyInstitution(w, k) => {
            l.verify_institution(&ctx(*w), &InstitutionId::new(KEYS[*k]).unwrap())
        }
        Op::RegisterStudent(w, k) => {
            l.register_student(&ctx(*w), &StudentId::new(KEYS[*k]).unwrap())
        }
        Op::VerifyStudent(w, k) => l.verify_student(&ctx(*w), &StudentId::new(KEYS[*k]).unwrap()),
        Op::Issue(w, a, i) => l.issue_achievement(
            &ctx(*w),
            &IssueRequest {
                achievement_id: AchievementId::new(KEYS[*a]).unwrap(),
                student_id: StudentId::new("student").unwrap(),
                institution_id: InstitutionId::new(KEYS[*i]).unwrap(),
                achievement_type: "certificate".to_string(),
                name: "Name".to_string(),
                description: "Description".to_string(),
                metadata_uri: None,
            },
        ),
        Op::Revoke(w, k) => l.revoke_achievement(&ctx(*w), &AchievementId::new(KEYS[*k]).unwrap()),
    };
    result.is_ok()
}

fn ledger() -> Ledger {
    Ledger::new(DeploymentConfig::new(p(0), p(1)))
}

proptest! {
    /// A rejected call never changes the store.
    #[test]
    fn rejected_calls_leave_store_unchanged(ops in prop::collection::vec(op(), 1..40)) {
        let mut l = ledger();
        for (i, op) in ops.iter().enumerate() {
            let before = l.store().digest().unwrap();
            if !apply(&mut l, op, i as u64 + 1) {
                prop_assert_eq!(l.store().digest().unwrap(), before, "op {:?}", op);
            }
        }
    }

    /// Owners, verification flags and revocation flags never revert, and
    /// issue heights never change.
    #[test]
    fn one_way_fields_are_stable(ops in prop::collection::vec(op(), 1..40)) {
        let mut l = ledger();
        for (i, op) in ops.iter().enumerate() {
            let before = l.clone();
            apply(&mut l, op, i as u64 + 1);
            for key in KEYS {
                let iid = InstitutionId::new(key).unwrap();
                if let Some(old) = before.get_institution_info(&iid) {
                    let new = l.get_institution_info(&iid).unwrap();
                    prop_assert_eq!(&new.owner, &old.owner);
                    prop_assert_eq!(&new.name, &old.name);
                    prop_assert!(new.verified || !old.verified);
                }
                let sid = StudentId::new(key).unwrap();
                if let Some(old) = before.get_student_info(&sid) {
                    let new = l.get_student_info(&sid).unwrap();
                    prop_assert!(new.verified || !old.verified);
                    if old.verified {
                        prop_assert_eq!(&new, &old);
                    }
                    prop_assert_eq!(new.verified, new.verification_height.is_some());
                    prop_assert_eq!(new.verified, new.verification_authority.is_some());
                }
                let aid = AchievementId::new(key).unwrap();
                if let Some(old) = before.get_achievement(&aid) {
                    let new = l.get_achievement(&aid).unwrap();
                    prop_assert_eq!(new.issue_height, old.issue_height);
                    prop_assert_eq!(&new.institution_id, &old.institution_id);
                    prop_assert!(new.revoked || !old.revoked);
                }
            }
        }
    }

    /// Registering a fresh institution id always succeeds unverified; the
    /// second registration always fails.
    #[test]
    fn registration_is_unique(key in "[a-z0-9-]{1,32}", first in 0..4usize, second in 0..4usize) {
        let mut l = ledger();
        let id = InstitutionId::new(key).unwrap();
        prop_assert!(l.register_institution(&CallContext::new(p(first), 1), &id, "A").is_ok());
        prop_assert!(!l.is_institution_verified(&id));
        prop_assert!(l.register_institution(&CallContext::new(p(second), 2), &id, "B").is_err());
        prop_assert_eq!(l.get_institution_info(&id).unwrap().owner, p(first));
    }
}

//! # Keyed Record Stores
//!
//! The rule engines see storage only through [`RecordStore`]:
//! `get(store, key)` and `put(store, key, record)`, both infallible. Records
//! are never deleted.
//!
//! - [`MemoryStore`] keeps one ordered map per store and is what the CLI
//!   persists as JSON.
//! - [`Transaction`] stages writes over any other `RecordStore` and applies
//!   them only on [`Transaction::commit`]. Dropping it discards every write.
//!
//! [`TypedStore`] layers typed accessors over the raw interface so the
//! engines never match on [`Record`] themselves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use credreg_core::{
    sha256_digest, AchievementId, CanonicalBytes, CanonicalizationError, ContentDigest,
    InstitutionId, StudentId,
};

use crate::achievement::AchievementRecord;
use crate::institution::InstitutionRecord;
use crate::student::StudentRecord;

/// The three record stores of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreName {
    /// Institution records, keyed by institution id.
    Institutions,
    /// Student records, keyed by student id.
    Students,
    /// Achievement records, keyed by achievement id.
    Achievements,
}

impl StoreName {
    /// Returns the store name as written in logs and snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Institutions => "institutions",
            Self::Students => "students",
            Self::Achievements => "achievements",
        }
    }
}

impl std::fmt::Display for StoreName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any record the registry stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    /// An institution record.
    Institution(InstitutionRecord),
    /// A student record.
    Student(StudentRecord),
    /// An achievement record.
    Achievement(AchievementRecord),
}

impl Record {
    /// The store this record belongs in.
    pub fn store(&self) -> StoreName {
        match self {
            Self::Institution(_) => StoreName::Institutions,
            Self::Student(_) => StoreName::Students,
            Self::Achievement(_) => StoreName::Achievements,
        }
    }
}

/// Keyed record storage as seen by the rule engines.
pub trait RecordStore {
    /// Look up a record.
    fn get(&self, store: StoreName, key: &str) -> Option<Record>;

    /// Insert or overwrite a record.
    fn put(&mut self, store: StoreName, key: &str, record: Record);

    /// Whether a record exists under `key`.
    fn contains(&self, store: StoreName, key: &str) -> bool {
        self.get(store, key).is_some()
    }
}

/// Typed accessors over a [`RecordStore`].
///
/// A record of the wrong kind under a key is treated as absent and logged;
/// the engines only ever write matching kinds.
pub trait TypedStore: RecordStore {
    /// Fetch an institution record.
    fn institution(&self, id: &InstitutionId) -> Option<InstitutionRecord> {
        match self.get(StoreName::Institutions, id.as_str())? {
            Record::Institution(r) => Some(r),
            other => mismatched(StoreName::Institutions, id.as_str(), &other),
        }
    }

    /// Store an institution record.
    fn put_institution(&mut self, id: &InstitutionId, record: InstitutionRecord) {
        self.put(StoreName::Institutions, id.as_str(), Record::Institution(record));
    }

    /// Fetch a student record.
    fn student(&self, id: &StudentId) -> Option<StudentRecord> {
        match self.get(StoreName::Students, id.as_str())? {
            Record::Student(r) => Some(r),
            other => mismatched(StoreName::Students, id.as_str(), &other),
        }
    }

    /// Store a student record.
    fn put_student(&mut self, id: &StudentId, record: StudentRecord) {
        self.put(StoreName::Students, id.as_str(), Record::Student(record));
    }

    /// Fetch an achievement record.
    fn achievement(&self, id: &AchievementId) -> Option<AchievementRecord> {
        match self.get(StoreName::Achievements, id.as_str())? {
            Record::Achievement(r) => Some(r),
            other => mismatched(StoreName::Achievements, id.as_str(), &other),
        }
    }

    /// Store an achievement record.
    fn put_achievement(&mut self, id: &AchievementId, record: AchievementRecord) {
        self.put(StoreName::Achievements, id.as_str(), Record::Achievement(record));
    }
}

impl<S: RecordStore + ?Sized> TypedStore for S {}

fn mismatched<T>(store: StoreName, key: &str, found: &Record) -> Option<T> {
    tracing::error!(
        %store,
        key,
        found = %found.store(),
        "record kind does not match its store; treating as absent"
    );
    None
}

// ─── In-memory store ─────────────────────────────────────────────────

/// Ordered in-memory maps, one per store.
///
/// Serializes to a stable JSON document; [`MemoryStore::digest`] hashes its
/// canonical form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    institutions: BTreeMap<String, Record>,
    #[serde(default)]
    students: BTreeMap<String, Record>,
    #[serde(default)]
    achievements: BTreeMap<String, Record>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, store: StoreName) -> &BTreeMap<String, Record> {
        match store {
            StoreName::Institutions => &self.institutions,
            StoreName::Students => &self.students,
            StoreName::Achievements => &self.achievements,
        }
    }

    fn table_mut(&mut self, store: StoreName) -> &mut BTreeMap<String, Record> {
        match store {
            StoreName::Institutions => &mut self.institutions,
            StoreName::Students => &mut self.students,
            StoreName::Achievements => &mut self.achievements,
        }
    }

    /// Number of records in one store.
    pub fn len(&self, store: StoreName) -> usize {
        self.table(store).len()
    }

    /// Whether all three stores are empty.
    pub fn is_empty(&self) -> bool {
        self.institutions.is_empty() && self.students.is_empty() && self.achievements.is_empty()
    }

    /// Keys of one store, in order.
    pub fn keys(&self, store: StoreName) -> impl Iterator<Item = &str> {
        self.table(store).keys().map(String::as_str)
    }

    /// SHA-256 over the canonical JSON of all three stores.
    pub fn digest(&self) -> Result<ContentDigest, CanonicalizationError> {
        Ok(sha256_digest(&CanonicalBytes::new(self)?))
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, store: StoreName, key: &str) -> Option<Record> {
        self.table(store).get(key).cloned()
    }

    fn put(&mut self, store: StoreName, key: &str, record: Record) {
        self.table_mut(store).insert(key.to_string(), record);
    }

    fn contains(&self, store: StoreName, key: &str) -> bool {
        self.table(store).contains_key(key)
    }
}

// ─── Transaction ─────────────────────────────────────────────────────

/// Write-staging overlay over a base store.
///
/// Reads see staged writes first. Nothing reaches the base store until
/// [`commit`](Transaction::commit).
#[derive(Debug)]
pub struct Transaction<'s, S: RecordStore + ?Sized> {
    base: &'s mut S,
    writes: BTreeMap<(StoreName, String), Record>,
}

impl<'s, S: RecordStore + ?Sized> Transaction<'s, S> {
    /// Open a transaction over `base`.
    pub fn begin(base: &'s mut S) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    /// Number of staged writes.
    pub fn pending(&self) -> usize {
        self.writes.len()
    }

    /// Apply every staged write to the base store, in key order.
    /// Returns the number of writes applied.
    pub fn commit(self) -> usize {
        let count = self.writes.len();
        for ((store, key), record) in self.writes {
            self.base.put(store, &key, record);
        }
        count
    }

    /// Discard every staged write.
    pub fn rollback(self) {
        tracing::trace!(discarded = self.writes.len(), "transaction rolled back");
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Transaction<'_, S> {
    fn get(&self, store: StoreName, key: &str) -> Option<Record> {
        match self.writes.get(&(store, key.to_string())) {
            Some(record) => Some(record.clone()),
            None => self.base.get(store, key),
        }
    }

    fn put(&mut self, store: StoreName, key: &str, record: Record) {
        self.writes.insert((store, key.to_string()), record);
    }
}

//! The ordered, atomic substrate certificate records live on.
//!
//! A [`Ledger`] serializes every mutation through one writer and stamps it
//! with a strictly increasing sequence number and a non-decreasing commit
//! time. Reads never take the writer lock.

use std::sync::Mutex;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use certum_core::{CertificateId, CertificateRecord, Identity, Mutation, Timestamp};

use crate::error::RegistryError;
use crate::rules::MutationRules;

/// Proof that a mutation was committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Position in the journal, starting at 1.
    pub sequence: u64,
    /// Store time the mutation committed at.
    pub committed_at: Timestamp,
    /// False for an accepted no-op (re-revoking a revoked certificate).
    pub changed: bool,
}

/// A committed mutation as recorded in the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub sequence: u64,
    pub committed_at: Timestamp,
    pub caller: Identity,
    pub mutation: Mutation,
    pub changed: bool,
}

impl JournalEntry {
    pub fn receipt(&self) -> Receipt {
        Receipt {
            sequence: self.sequence,
            committed_at: self.committed_at,
            changed: self.changed,
        }
    }
}

/// Storage substrate with a single total order over mutations.
pub trait Ledger: Send + Sync {
    /// Read the committed record under `id`.
    fn get(&self, id: &CertificateId) -> Result<Option<CertificateRecord>, RegistryError>;

    /// Apply `mutation` atomically under `rules`.
    ///
    /// `now` is the caller's clock reading; the ledger never commits at a
    /// time earlier than its previous commit.
    fn apply(
        &self,
        caller: Identity,
        mutation: Mutation,
        now: Timestamp,
        rules: &MutationRules,
    ) -> Result<Receipt, RegistryError>;

    /// Journal entries with `sequence >= from`, at most `limit` of them.
    fn journal(&self, from: u64, limit: usize) -> Result<Vec<JournalEntry>, RegistryError>;

    /// Number of certificate records.
    fn record_count(&self) -> Result<usize, RegistryError>;

    /// Sequence number of the last committed mutation (0 when empty).
    fn head(&self) -> Result<u64, RegistryError>;
}

#[derive(Debug, Default)]
struct WriterState {
    journal: Vec<JournalEntry>,
    last_committed_at: Timestamp,
}

/// In-process ledger backed by a concurrent map and an in-memory journal.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    records: DashMap<CertificateId, CertificateRecord>,
    writer: Mutex<WriterState>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, WriterState>, RegistryError> {
        self.writer
            .lock()
            .map_err(|_| RegistryError::SubstrateUnavailable("ledger writer lock poisoned".into()))
    }
}

impl Ledger for MemoryLedger {
    fn get(&self, id: &CertificateId) -> Result<Option<CertificateRecord>, RegistryError> {
        Ok(self.records.get(id).map(|entry| entry.clone()))
    }

    fn apply(
        &self,
        caller: Identity,
        mutation: Mutation,
        now: Timestamp,
        rules: &MutationRules,
    ) -> Result<Receipt, RegistryError> {
        let mut writer = self.lock()?;

        let committed_at = now.max(writer.last_committed_at);
        let id = mutation.id();
        let current = self.get(&id)?;
        let applied = rules.apply(current.as_ref(), &mutation, committed_at)?;

        let entry = JournalEntry {
            sequence: writer.journal.len() as u64 + 1,
            committed_at,
            caller,
            mutation,
            changed: applied.changed,
        };
        if applied.changed {
            self.records.insert(id, applied.record);
        }
        let receipt = entry.receipt();
        writer.journal.push(entry);
        writer.last_committed_at = committed_at;

        Ok(receipt)
    }

    fn journal(&self, from: u64, limit: usize) -> Result<Vec<JournalEntry>, RegistryError> {
        let writer = self.lock()?;
        let start = from.saturating_sub(1) as usize;
        Ok(writer
            .journal
            .iter()
            .skip(start)
            .take(limit)
            .cloned()
            .collect())
    }

    fn record_count(&self) -> Result<usize, RegistryError> {
        Ok(self.records.len())
    }

    fn head(&self) -> Result<u64, RegistryError> {
        Ok(self.lock()?.journal.len() as u64)
    }
}

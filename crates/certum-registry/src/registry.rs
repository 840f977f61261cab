use std::sync::Arc;

use certum_core::{
    CertificateId, CertificateRecord, HolderHash, Identity, Mutation, NewCertificate,
    RegistryPolicy, Verification,
};

use crate::clock::{Clock, SystemClock};
use crate::engine::VerificationEngine;
use crate::error::RegistryError;
use crate::guard::AccessGuard;
use crate::ledger::{JournalEntry, Ledger, MemoryLedger, Receipt};
use crate::revocation::RevocationManager;
use crate::rules::MutationRules;
use crate::store::RecordStore;

/// The certificate registry: one authority, one ledger, one clock.
#[derive(Clone)]
pub struct CertificateRegistry {
    guard: AccessGuard,
    ledger: Arc<dyn Ledger>,
    clock: Arc<dyn Clock>,
    store: RecordStore,
    revocation: RevocationManager,
    engine: VerificationEngine,
}

impl CertificateRegistry {
    /// Build a registry over `ledger`, governed by `authority`.
    pub fn new(
        authority: Identity,
        ledger: Arc<dyn Ledger>,
        clock: Arc<dyn Clock>,
        policy: RegistryPolicy,
    ) -> Self {
        let guard = AccessGuard::new(authority);
        let rules = MutationRules::new(policy.revocation);
        let store = RecordStore::new(ledger.clone(), clock.clone(), guard, rules);
        let revocation = RevocationManager::new(ledger.clone(), clock.clone(), guard, rules);
        Self {
            guard,
            ledger,
            clock,
            store,
            revocation,
            engine: VerificationEngine::new(policy.disclosure),
        }
    }

    /// In-memory registry on the system clock with default policy.
    pub fn in_memory(authority: Identity) -> Self {
        Self::new(
            authority,
            Arc::new(MemoryLedger::new()),
            Arc::new(SystemClock),
            RegistryPolicy::default(),
        )
    }

    /// The identity allowed to issue and revoke.
    pub fn authority(&self) -> Identity {
        self.guard.authority()
    }

    pub fn issue(
        &self,
        caller: &Identity,
        certificate: NewCertificate,
    ) -> Result<Receipt, RegistryError> {
        self.store.issue(caller, certificate)
    }

    pub fn get(&self, id: &CertificateId) -> Result<CertificateRecord, RegistryError> {
        self.store.get(id)
    }

    pub fn revoke(&self, caller: &Identity, id: CertificateId) -> Result<Receipt, RegistryError> {
        self.revocation.revoke(caller, id)
    }

    /// Dispatch a mutation to the store or revocation manager.
    pub fn apply(&self, caller: &Identity, mutation: Mutation) -> Result<Receipt, RegistryError> {
        match mutation {
            Mutation::Issue(certificate) => self.issue(caller, certificate),
            Mutation::Revoke { id } => self.revoke(caller, id),
        }
    }

    /// Check `claimed` against the record under `id` at the current time.
    ///
    /// A missing record yields `valid = false`; only substrate failures
    /// are errors.
    pub fn verify(
        &self,
        id: &CertificateId,
        claimed: &HolderHash,
    ) -> Result<Verification, RegistryError> {
        let record = self.ledger.get(id)?;
        let verdict = self.engine.evaluate(record.as_ref(), claimed, self.clock.now());
        tracing::debug!(
            certificate_id = %id,
            valid = verdict.valid,
            revoked = verdict.is_revoked,
            "certificate verified"
        );
        Ok(verdict)
    }

    pub fn journal(&self, from: u64, limit: usize) -> Result<Vec<JournalEntry>, RegistryError> {
        self.ledger.journal(from, limit)
    }

    pub fn record_count(&self) -> Result<usize, RegistryError> {
        self.ledger.record_count()
    }

    pub fn head(&self) -> Result<u64, RegistryError> {
        self.ledger.head()
    }
}

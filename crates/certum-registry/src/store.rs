use std::sync::Arc;

use certum_core::{CertificateId, CertificateRecord, Identity, Mutation, NewCertificate};

use crate::clock::Clock;
use crate::error::RegistryError;
use crate::guard::AccessGuard;
use crate::ledger::{Ledger, Receipt};
use crate::rules::MutationRules;

/// Issues and looks up certificate records.
#[derive(Clone)]
pub struct RecordStore {
    ledger: Arc<dyn Ledger>,
    clock: Arc<dyn Clock>,
    guard: AccessGuard,
    rules: MutationRules,
}

impl RecordStore {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        clock: Arc<dyn Clock>,
        guard: AccessGuard,
        rules: MutationRules,
    ) -> Self {
        Self {
            ledger,
            clock,
            guard,
            rules,
        }
    }

    /// Create a record under a fresh identifier.
    ///
    /// Fails with `Unauthorized` for any caller other than the authority and
    /// with `DuplicateId` if the identifier is taken; the existing record is
    /// never overwritten.
    pub fn issue(
        &self,
        caller: &Identity,
        certificate: NewCertificate,
    ) -> Result<Receipt, RegistryError> {
        self.guard.authorize(caller)?;

        let id = certificate.id;
        let receipt = self.ledger.apply(
            *caller,
            Mutation::Issue(certificate),
            self.clock.now(),
            &self.rules,
        )?;

        tracing::info!(
            certificate_id = %id,
            sequence = receipt.sequence,
            issued_at = receipt.committed_at,
            "certificate issued"
        );
        Ok(receipt)
    }

    /// Read the record under `id`.
    pub fn get(&self, id: &CertificateId) -> Result<CertificateRecord, RegistryError> {
        self.ledger.get(id)?.ok_or(RegistryError::NotFound(*id))
    }
}

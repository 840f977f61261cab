use std::sync::Arc;

use certum_core::{CertificateId, Identity, Mutation};

use crate::clock::Clock;
use crate::error::RegistryError;
use crate::guard::AccessGuard;
use crate::ledger::{Ledger, Receipt};
use crate::rules::MutationRules;

/// Applies the one-way `revoked` transition.
#[derive(Clone)]
pub struct RevocationManager {
    ledger: Arc<dyn Ledger>,
    clock: Arc<dyn Clock>,
    guard: AccessGuard,
    rules: MutationRules,
}

impl RevocationManager {
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

    /// Revoke the certificate under `id`.
    pub fn revoke(&self, caller: &Identity, id: CertificateId) -> Result<Receipt, RegistryError> {
        self.guard.authorize(caller)?;

        let receipt =
            self.ledger
                .apply(*caller, Mutation::Revoke { id }, self.clock.now(), &self.rules)?;

        if receipt.changed {
            tracing::info!(
                certificate_id = %id,
                sequence = receipt.sequence,
                "certificate revoked"
            );
        } else {
            tracing::debug!(certificate_id = %id, "certificate already revoked");
        }
        Ok(receipt)
    }
}

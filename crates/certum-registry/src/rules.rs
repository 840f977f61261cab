//! Record-level mutation rules.
//!
//! Ledgers call [`MutationRules::apply`] inside their write critical section
//! so the precondition checks and the write commit together.

use certum_core::{
    CertificateRecord, CertificateState, CertificateStateMachine, CoreError, Mutation,
    RevocationMode, Timestamp,
};

use crate::error::RegistryError;

/// Result of applying a mutation to the current record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Record to persist.
    pub record: CertificateRecord,
    /// False when the mutation was accepted without changing the record.
    pub changed: bool,
}

/// Rules governing how mutations change records.
#[derive(Debug, Clone, Copy, Default)]
pub struct MutationRules {
    pub revocation: RevocationMode,
}

impl MutationRules {
    pub fn new(revocation: RevocationMode) -> Self {
        Self { revocation }
    }

    /// Apply `mutation` to the record currently stored under its id.
    pub fn apply(
        &self,
        current: Option<&CertificateRecord>,
        mutation: &Mutation,
        committed_at: Timestamp,
    ) -> Result<Applied, RegistryError> {
        let id = mutation.id();
        let state = current
            .map(CertificateRecord::state)
            .unwrap_or(CertificateState::Unissued);

        let transition = CertificateStateMachine::transition(state, mutation.event()).map_err(
            |e| match (e, mutation) {
                (CoreError::InvalidStateTransition { .. }, Mutation::Issue(_)) => {
                    RegistryError::DuplicateId(id)
                }
                (CoreError::InvalidStateTransition { .. }, Mutation::Revoke { .. }) => {
                    RegistryError::NotFound(id)
                }
                (other, _) => RegistryError::Core(other),
            },
        )?;

        match (mutation, current) {
            (Mutation::Issue(cert), _) => Ok(Applied {
                record: cert.clone().into_record(committed_at),
                changed: true,
            }),
            (Mutation::Revoke { .. }, Some(existing)) => {
                if !transition.changed && self.revocation == RevocationMode::Strict {
                    return Err(RegistryError::AlreadyRevoked(id));
                }
                let mut record = existing.clone();
                record.revoked = true;
                Ok(Applied {
                    record,
                    changed: transition.changed,
                })
            }
            (Mutation::Revoke { .. }, None) => Err(RegistryError::NotFound(id)),
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::certificate_state::CertificateEvent;
use crate::record::NewCertificate;
use crate::types::CertificateId;

/// A state-changing operation on the record store.
///
/// This is both the unit the ledger orders and the payload a caller signs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    Issue(NewCertificate),
    Revoke { id: CertificateId },
}

impl Mutation {
    /// Identifier the mutation targets.
    pub fn id(&self) -> CertificateId {
        match self {
            Self::Issue(cert) => cert.id,
            Self::Revoke { id } => *id,
        }
    }

    /// Lifecycle event this mutation drives.
    pub fn event(&self) -> CertificateEvent {
        match self {
            Self::Issue(_) => CertificateEvent::Issue,
            Self::Revoke { .. } => CertificateEvent::Revoke,
        }
    }
}

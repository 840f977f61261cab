use serde::{Deserialize, Serialize};

use crate::certificate_state::CertificateState;
use crate::types::{CertificateId, HolderHash, Timestamp, NEVER_EXPIRES};

/// A certificate as persisted in the record store.
///
/// Only `revoked` ever changes after issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub id: CertificateId,
    /// Commitment over the holder's identity fields and salt.
    pub holder_hash: HolderHash,
    pub title: String,
    pub issuer: String,
    /// Store time at which issuance committed.
    pub issued_at: Timestamp,
    /// Expiry in unix seconds, or [`NEVER_EXPIRES`].
    pub expires_at: Timestamp,
    pub revoked: bool,
}

impl CertificateRecord {
    /// Whether the record has no expiry.
    pub fn never_expires(&self) -> bool {
        self.expires_at == NEVER_EXPIRES
    }

    /// Whether the record has expired at `now`. Expiry is exclusive:
    /// a certificate is still valid strictly before `expires_at`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        !self.never_expires() && now >= self.expires_at
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CertificateState {
        if self.revoked {
            CertificateState::Revoked
        } else {
            CertificateState::Active
        }
    }
}

/// Issuance request fields; the store fills in `issued_at` and `revoked`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCertificate {
    pub id: CertificateId,
    pub holder_hash: HolderHash,
    pub title: String,
    pub issuer: String,
    #[serde(default)]
    pub expires_at: Timestamp,
}

impl NewCertificate {
    /// Materialize the record committed at `issued_at`.
    pub fn into_record(self, issued_at: Timestamp) -> CertificateRecord {
        CertificateRecord {
            id: self.id,
            holder_hash: self.holder_hash,
            title: self.title,
            issuer: self.issuer,
            issued_at,
            expires_at: self.expires_at,
            revoked: false,
        }
    }
}

/// An individual verification check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCheck {
    /// Name of the check.
    pub name: String,
    /// Whether the check passed.
    pub passed: bool,
}

/// Verdict of a verification query.
///
/// `valid` is false for a missing record; absence is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Verification {
    pub valid: bool,
    pub is_revoked: bool,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    pub title: String,
    pub issuer: String,
    /// Individual checks, in evaluation order.
    #[serde(default)]
    pub checks: Vec<VerificationCheck>,
}

impl Verification {
    /// Name of the first failing check, if any.
    pub fn failure_reason(&self) -> Option<&str> {
        self.checks
            .iter()
            .find(|c| !c.passed)
            .map(|c| c.name.as_str())
    }
}

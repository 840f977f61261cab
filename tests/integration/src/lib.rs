//! Shared fixtures for the cross-crate tests.

use std::sync::Arc;

use certum_core::{CertificateId, HolderHash, NewCertificate, RegistryPolicy, Timestamp};
use certum_crypto::{HolderCommitment, KeyPair};
use certum_registry::{CertificateRegistry, ManualClock, MemoryLedger};

/// Start of the manual clock in every fixture.
pub const GENESIS: Timestamp = 1_700_000_000;

/// A registry with a known authority key and a controllable clock.
pub struct Fixture {
    pub registry: CertificateRegistry,
    pub authority: KeyPair,
    pub clock: Arc<ManualClock>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_policy(RegistryPolicy::default())
    }

    pub fn with_policy(policy: RegistryPolicy) -> Self {
        let authority = KeyPair::generate();
        let clock = Arc::new(ManualClock::new(GENESIS));
        let registry = CertificateRegistry::new(
            authority.identity(),
            Arc::new(MemoryLedger::new()),
            clock.clone(),
            policy,
        );
        Self {
            registry,
            authority,
            clock,
        }
    }

    /// Issue a certificate for a holder and return the commitment the
    /// holder keeps.
    pub fn issue_for(
        &self,
        label: &str,
        student_number: &str,
        name: &str,
        expires_at: Timestamp,
    ) -> HolderCommitment {
        let commitment = HolderCommitment::generate(student_number, name);
        self.registry
            .issue(
                &self.authority.identity(),
                certificate(label, commitment.holder_hash, expires_at),
            )
            .expect("issuance by the authority should succeed");
        commitment
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

pub fn id(label: &str) -> CertificateId {
    CertificateId::from_label(label).expect("valid label")
}

pub fn certificate(label: &str, holder_hash: HolderHash, expires_at: Timestamp) -> NewCertificate {
    NewCertificate {
        id: id(label),
        holder_hash,
        title: "Bachelor of Science".into(),
        issuer: "Faculty of Engineering".into(),
        expires_at,
    }
}

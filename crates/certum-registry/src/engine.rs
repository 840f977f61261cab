use certum_core::{
    CertificateRecord, DisclosurePolicy, HolderHash, Timestamp, Verification, VerificationCheck,
};

/// Evaluates a verification query against a (possibly missing) record.
///
/// Pure: no I/O, no side effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerificationEngine {
    disclosure: DisclosurePolicy,
}

impl VerificationEngine {
    pub fn new(disclosure: DisclosurePolicy) -> Self {
        Self { disclosure }
    }

    /// Compute the verdict for `claimed` at time `now`.
    pub fn evaluate(
        &self,
        record: Option<&CertificateRecord>,
        claimed: &HolderHash,
        now: Timestamp,
    ) -> Verification {
        let Some(record) = record else {
            return Verification {
                checks: vec![check("record_found", false)],
                ..Default::default()
            };
        };

        let hash_matches = record.holder_hash == *claimed;
        let not_expired = !record.is_expired_at(now);
        let not_revoked = !record.revoked;
        let valid = hash_matches && not_expired && not_revoked;

        let checks = vec![
            check("record_found", true),
            check("holder_hash_matches", hash_matches),
            check("not_expired", not_expired),
            check("not_revoked", not_revoked),
        ];

        let disclose = valid || self.disclosure == DisclosurePolicy::Full;
        if disclose {
            Verification {
                valid,
                is_revoked: record.revoked,
                issued_at: record.issued_at,
                expires_at: record.expires_at,
                title: record.title.clone(),
                issuer: record.issuer.clone(),
                checks,
            }
        } else {
            Verification {
                valid,
                is_revoked: record.revoked,
                checks,
                ..Default::default()
            }
        }
    }
}

fn check(name: &str, passed: bool) -> VerificationCheck {
    VerificationCheck {
        name: name.into(),
        passed,
    }
}

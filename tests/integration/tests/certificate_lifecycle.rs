//! Integration test: certificate lifecycle across crates.
//!
//! Commitment generation in certum-crypto, issuance and revocation through
//! the certum-registry facade, verification by a third party that only
//! knows the holder's identity fields and salt.

use certum_core::{DisclosurePolicy, RegistryPolicy, RevocationMode};
use certum_crypto::{commit, Salt};
use certum_integration_tests::{certificate, id, Fixture, GENESIS};
use certum_registry::RegistryError;

// =========================================================================
// Issuer → holder → verifier
// =========================================================================

#[test]
fn test_holder_proves_ownership_with_salt() {
    let fx = Fixture::new();
    let commitment = fx.issue_for("diploma-2024-001", "20190001", "Ada Lovelace", 0);

    // Verifier recomputes the commitment from what the holder presents.
    let salt = Salt::from_hex(&commitment.salt.to_hex()).unwrap();
    let presented = commit("20190001", "  ada lovelace ", &salt);

    let verdict = fx
        .registry
        .verify(&id("diploma-2024-001"), &presented)
        .unwrap();
    assert!(verdict.valid);
    assert!(!verdict.is_revoked);
    assert_eq!(verdict.issued_at, GENESIS);
    assert_eq!(verdict.expires_at, 0);
    assert_eq!(verdict.title, "Bachelor of Science");
    assert_eq!(verdict.issuer, "Faculty of Engineering");
    assert!(verdict.checks.iter().all(|c| c.passed));
}

#[test]
fn test_wrong_identity_fields_do_not_verify() {
    let fx = Fixture::new();
    let commitment = fx.issue_for("diploma-1", "20190001", "Ada Lovelace", 0);

    for (student, name) in [("20190002", "Ada Lovelace"), ("20190001", "Ada Byron")] {
        let presented = commit(student, name, &commitment.salt);
        let verdict = fx.registry.verify(&id("diploma-1"), &presented).unwrap();
        assert!(!verdict.valid);
        assert!(!verdict.is_revoked);
        assert_eq!(verdict.failure_reason(), Some("holder_hash_matches"));
    }

    let other_salt = Salt::generate();
    let presented = commit("20190001", "Ada Lovelace", &other_salt);
    assert!(!fx.registry.verify(&id("diploma-1"), &presented).unwrap().valid);
}

#[test]
fn test_revocation_is_visible_to_verifiers() {
    let fx = Fixture::new();
    let commitment = fx.issue_for("cert1", "42", "Grace Hopper", 0);
    let authority = fx.authority.identity();

    fx.clock.advance(60);
    let receipt = fx.registry.revoke(&authority, id("cert1")).unwrap();
    assert!(receipt.changed);
    assert_eq!(receipt.committed_at, GENESIS + 60);

    let verdict = fx
        .registry
        .verify(&id("cert1"), &commitment.holder_hash)
        .unwrap();
    assert!(!verdict.valid);
    assert!(verdict.is_revoked);
    // Revocation never touches the original issuance data.
    assert_eq!(verdict.issued_at, GENESIS);
    assert_eq!(verdict.failure_reason(), Some("not_revoked"));
}

#[test]
fn test_expiry_boundary() {
    let fx = Fixture::new();
    let expires_at = GENESIS + 3_600;
    let commitment = fx.issue_for("temp-pass", "7", "Alan Turing", expires_at);
    let holder = commitment.holder_hash;

    fx.clock.set(expires_at - 1);
    assert!(fx.registry.verify(&id("temp-pass"), &holder).unwrap().valid);

    fx.clock.set(expires_at);
    let at = fx.registry.verify(&id("temp-pass"), &holder).unwrap();
    assert!(!at.valid);
    assert!(!at.is_revoked);
    assert_eq!(at.failure_reason(), Some("not_expired"));

    fx.clock.set(expires_at + 86_400);
    assert!(!fx.registry.verify(&id("temp-pass"), &holder).unwrap().valid);
}

#[test]
fn test_never_expiring_certificate() {
    let fx = Fixture::new();
    let commitment = fx.issue_for("lifetime", "1", "Emmy Noether", 0);
    fx.clock.set(u64::MAX / 2);
    assert!(
        fx.registry
            .verify(&id("lifetime"), &commitment.holder_hash)
            .unwrap()
            .valid
    );
}

#[test]
fn test_unknown_certificate_is_invalid_not_error() {
    let fx = Fixture::new();
    let salt = Salt::generate();
    let verdict = fx
        .registry
        .verify(&id("never-issued"), &commit("1", "Nobody", &salt))
        .unwrap();
    assert!(!verdict.valid);
    assert!(!verdict.is_revoked);
    assert!(verdict.title.is_empty());
    assert_eq!(verdict.issued_at, 0);
}

// =========================================================================
// Policies
// =========================================================================

#[test]
fn test_valid_only_disclosure_hides_details_on_failure() {
    let fx = Fixture::with_policy(RegistryPolicy {
        disclosure: DisclosurePolicy::ValidOnly,
        revocation: RevocationMode::Idempotent,
    });
    let commitment = fx.issue_for("cert1", "1", "Ada", 0);

    let ok = fx
        .registry
        .verify(&id("cert1"), &commitment.holder_hash)
        .unwrap();
    assert!(ok.valid);
    assert_eq!(ok.title, "Bachelor of Science");

    let wrong = commit("2", "Ada", &commitment.salt);
    let denied = fx.registry.verify(&id("cert1"), &wrong).unwrap();
    assert!(!denied.valid);
    assert!(denied.title.is_empty());
    assert!(denied.issuer.is_empty());
    assert_eq!(denied.issued_at, 0);
}

#[test]
fn test_double_revoke_modes() {
    let idempotent = Fixture::new();
    idempotent.issue_for("c", "1", "A", 0);
    let auth = idempotent.authority.identity();
    idempotent.registry.revoke(&auth, id("c")).unwrap();
    let again = idempotent.registry.revoke(&auth, id("c")).unwrap();
    assert!(!again.changed);

    let strict = Fixture::with_policy(RegistryPolicy {
        disclosure: DisclosurePolicy::Full,
        revocation: RevocationMode::Strict,
    });
    strict.issue_for("c", "1", "A", 0);
    let auth = strict.authority.identity();
    strict.registry.revoke(&auth, id("c")).unwrap();
    assert!(matches!(
        strict.registry.revoke(&auth, id("c")),
        Err(RegistryError::AlreadyRevoked(_))
    ));
    assert!(strict.registry.get(&id("c")).unwrap().revoked);
}

// =========================================================================
// Store invariants
// =========================================================================

#[test]
fn test_duplicate_id_never_overwrites() {
    let fx = Fixture::new();
    let first = fx.issue_for("dup", "1", "First Holder", 0);
    let second = certum_crypto::HolderCommitment::generate("2", "Second Holder");

    let result = fx
        .registry
        .issue(&fx.authority.identity(), certificate("dup", second.holder_hash, 0));
    assert!(matches!(result, Err(RegistryError::DuplicateId(_))));

    let record = fx.registry.get(&id("dup")).unwrap();
    assert_eq!(record.holder_hash, first.holder_hash);
}

#[test]
fn test_issue_after_revoke_is_duplicate() {
    let fx = Fixture::new();
    fx.issue_for("gone", "1", "A", 0);
    fx.registry
        .revoke(&fx.authority.identity(), id("gone"))
        .unwrap();

    let fresh = certum_crypto::HolderCommitment::generate("1", "A");
    assert!(matches!(
        fx.registry
            .issue(&fx.authority.identity(), certificate("gone", fresh.holder_hash, 0)),
        Err(RegistryError::DuplicateId(_))
    ));
    assert!(fx.registry.get(&id("gone")).unwrap().revoked);
}

#[test]
fn test_journal_records_every_committed_mutation() {
    let fx = Fixture::new();
    let auth = fx.authority.identity();
    fx.issue_for("a", "1", "A", 0);
    fx.issue_for("b", "2", "B", 0);
    fx.registry.revoke(&auth, id("a")).unwrap();
    fx.registry.revoke(&auth, id("a")).unwrap();
    // Rejected mutations leave no journal entry.
    assert!(fx.registry.revoke(&auth, id("zzz")).is_err());

    let journal = fx.registry.journal(1, 100).unwrap();
    assert_eq!(journal.len(), 4);
    assert_eq!(fx.registry.head().unwrap(), 4);
    assert_eq!(fx.registry.record_count().unwrap(), 2);
    for (i, entry) in journal.iter().enumerate() {
        assert_eq!(entry.sequence, i as u64 + 1);
        assert_eq!(entry.caller, auth);
    }
    assert!(journal[2].changed);
    assert!(!journal[3].changed);
}

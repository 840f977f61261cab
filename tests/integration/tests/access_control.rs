//! Integration test: authority-only mutation, signed requests and
//! concurrent access.

use std::sync::Arc;
use std::thread;

use certum_core::{CertificateId, Mutation};
use certum_crypto::{HolderCommitment, KeyPair, SignedEnvelope};
use certum_integration_tests::{certificate, id, Fixture};
use certum_registry::RegistryError;

#[test]
fn test_authority_is_fixed_and_queryable() {
    let fx = Fixture::new();
    assert_eq!(fx.registry.authority(), fx.authority.identity());
    fx.issue_for("c", "1", "A", 0);
    assert_eq!(fx.registry.authority(), fx.authority.identity());
}

#[test]
fn test_non_authority_cannot_issue_or_revoke() {
    let fx = Fixture::new();
    let commitment = fx.issue_for("c1", "1", "A", 0);
    let stranger = KeyPair::generate().identity();

    let issue = fx
        .registry
        .issue(&stranger, certificate("c2", commitment.holder_hash, 0));
    assert!(matches!(issue, Err(RegistryError::Unauthorized { caller }) if caller == stranger));

    let revoke = fx.registry.revoke(&stranger, id("c1"));
    assert!(matches!(revoke, Err(RegistryError::Unauthorized { .. })));

    // Nothing changed.
    assert!(fx.registry.get(&id("c2")).is_err());
    assert!(!fx.registry.get(&id("c1")).unwrap().revoked);
    assert_eq!(fx.registry.head().unwrap(), 1);
}

#[test]
fn test_unauthorized_revoke_of_missing_id_reports_unauthorized() {
    let fx = Fixture::new();
    let stranger = KeyPair::generate().identity();
    assert!(matches!(
        fx.registry.revoke(&stranger, id("missing")),
        Err(RegistryError::Unauthorized { .. })
    ));
}

#[test]
fn test_signed_request_identifies_caller() {
    let fx = Fixture::new();
    let commitment = HolderCommitment::generate("20190001", "Ada Lovelace");
    let mutation = Mutation::Issue(certificate("signed", commitment.holder_hash, 0));

    // Over the wire and back.
    let envelope = SignedEnvelope::seal(&mutation, &fx.authority).unwrap();
    let wire = serde_json::to_string(&envelope).unwrap();
    let received: SignedEnvelope = serde_json::from_str(&wire).unwrap();

    let (caller, decoded) = received.open::<Mutation>().unwrap();
    assert_eq!(caller, fx.authority.identity());
    fx.registry.apply(&caller, decoded).unwrap();
    assert!(
        fx.registry
            .verify(&id("signed"), &commitment.holder_hash)
            .unwrap()
            .valid
    );
}

#[test]
fn test_forged_signer_is_rejected() {
    let fx = Fixture::new();
    let attacker = KeyPair::generate();
    let mutation = Mutation::Revoke { id: id("c1") };

    // Attacker signs, then claims to be the authority.
    let mut envelope = SignedEnvelope::seal(&mutation, &attacker).unwrap();
    envelope.signer = fx.authority.identity();
    assert!(envelope.open::<Mutation>().is_err());

    // Signed honestly, the attacker is just not the authority.
    let honest = SignedEnvelope::seal(&mutation, &attacker).unwrap();
    let (caller, decoded) = honest.open::<Mutation>().unwrap();
    assert!(matches!(
        fx.registry.apply(&caller, decoded),
        Err(RegistryError::Unauthorized { .. })
    ));
}

#[test]
fn test_concurrent_issue_same_id_has_one_winner() {
    let fx = Arc::new(Fixture::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let fx = Arc::clone(&fx);
            thread::spawn(move || {
                let commitment = HolderCommitment::generate(&i.to_string(), "Racer");
                fx.registry.issue(
                    &fx.authority.identity(),
                    certificate("contested", commitment.holder_hash, 0),
                )
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(RegistryError::DuplicateId(_))))
        .count();
    assert_eq!(winners, 1);
    assert_eq!(duplicates, 7);
    assert_eq!(fx.registry.record_count().unwrap(), 1);
}

#[test]
fn test_concurrent_readers_and_writer() {
    let fx = Arc::new(Fixture::new());
    let labels: Vec<String> = (0..32).map(|i| format!("cert-{}", i)).collect();
    let commitments: Vec<_> = labels
        .iter()
        .map(|label| (label.clone(), fx.issue_for(label, "1", "Holder", 0)))
        .collect();
    let commitments = Arc::new(commitments);

    let writer = {
        let fx = Arc::clone(&fx);
        let labels = labels.clone();
        thread::spawn(move || {
            for label in labels.iter().step_by(2) {
                fx.registry
                    .revoke(&fx.authority.identity(), id(label))
                    .unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let fx = Arc::clone(&fx);
            let commitments = Arc::clone(&commitments);
            thread::spawn(move || {
                for (label, commitment) in commitments.iter() {
                    let verdict = fx
                        .registry
                        .verify(&id(label), &commitment.holder_hash)
                        .unwrap();
                    // Every read sees a fully committed record.
                    assert_eq!(verdict.valid, !verdict.is_revoked);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    for (i, label) in labels.iter().enumerate() {
        let revoked = fx.registry.get(&id(label)).unwrap().revoked;
        assert_eq!(revoked, i % 2 == 0);
    }
    assert_eq!(fx.registry.head().unwrap(), 32 + 16);
}

#[test]
fn test_label_truncation_maps_to_same_id() {
    let long = "a".repeat(40);
    let truncated = "a".repeat(32);
    assert_eq!(
        CertificateId::from_label(&long).unwrap(),
        CertificateId::from_label(&truncated).unwrap()
    );
}

//! Ed25519 signatures over request bytes.
//!
//! Only [`SignedEnvelope`](crate::SignedEnvelope) produces the bytes these
//! functions sign, so every signature the node accepts is bound to the
//! envelope domain tag.

use ed25519_dalek::{Signer, Verifier};

use crate::error::CryptoError;
use crate::keys::{KeyPair, PublicKey};

const SIGNATURE_LEN: usize = ed25519_dalek::SIGNATURE_LENGTH;

/// A detached Ed25519 signature, carried as hex on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(ed25519_dalek::Signature);

impl Signature {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_bytes())
    }

    /// Parse a hex signature; anything but exactly 64 bytes is rejected.
    pub fn from_hex(input: &str) -> Result<Self, CryptoError> {
        let raw = hex::decode(input).map_err(|e| CryptoError::InvalidInput(e.to_string()))?;
        let raw: [u8; SIGNATURE_LEN] = raw.as_slice().try_into().map_err(|_| {
            CryptoError::InvalidInput(format!(
                "signature is {} bytes, expected {}",
                raw.len(),
                SIGNATURE_LEN
            ))
        })?;
        Ok(Self(ed25519_dalek::Signature::from_bytes(&raw)))
    }
}

pub fn sign(bytes: &[u8], keypair: &KeyPair) -> Signature {
    Signature(keypair.signing_key().sign(bytes))
}

/// Check `signature` over `bytes` against `signer`.
pub fn verify(bytes: &[u8], signature: &Signature, signer: &PublicKey) -> Result<(), CryptoError> {
    signer
        .verifying_key()
        .verify(bytes, &signature.0)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{signing_bytes, DOMAIN_TAG};
    use crate::SignedEnvelope;

    fn revoke_payload() -> serde_json::Value {
        serde_json::json!({ "op": "revoke", "id": "cert1" })
    }

    #[test]
    fn test_signed_bytes_carry_domain_tag() {
        let payload = revoke_payload();
        let bytes = signing_bytes(&payload).unwrap();
        assert!(bytes.starts_with(DOMAIN_TAG));
        assert_eq!(&bytes[DOMAIN_TAG.len()..], serde_json::to_vec(&payload).unwrap());
    }

    #[test]
    fn test_untagged_signature_does_not_open() {
        let kp = KeyPair::generate();
        let payload = revoke_payload();
        let untagged = sign(&serde_json::to_vec(&payload).unwrap(), &kp);

        let tagged = signing_bytes(&payload).unwrap();
        assert!(verify(&tagged, &untagged, &kp.public_key()).is_err());

        let env = SignedEnvelope {
            payload,
            signer: kp.identity(),
            signature: untagged.to_hex(),
        };
        assert!(matches!(
            env.open::<serde_json::Value>(),
            Err(CryptoError::SignatureVerificationFailed)
        ));
    }

    #[test]
    fn test_field_order_does_not_change_signed_bytes() {
        let reordered: serde_json::Value =
            serde_json::from_str(r#"{"id":"cert1","op":"revoke"}"#).unwrap();
        assert_eq!(
            signing_bytes(&reordered).unwrap(),
            signing_bytes(&revoke_payload()).unwrap()
        );

        let kp = KeyPair::generate();
        let sealed = SignedEnvelope::seal(&revoke_payload(), &kp).unwrap();
        let sig = Signature::from_hex(&sealed.signature).unwrap();
        assert!(verify(&signing_bytes(&reordered).unwrap(), &sig, &kp.public_key()).is_ok());
    }

    #[test]
    fn test_sealed_signature_not_valid_for_other_request() {
        let kp = KeyPair::generate();
        let sealed = SignedEnvelope::seal(&revoke_payload(), &kp).unwrap();
        let sig = Signature::from_hex(&sealed.signature).unwrap();
        let other = signing_bytes(&serde_json::json!({ "op": "revoke", "id": "cert2" })).unwrap();
        assert!(verify(&other, &sig, &kp.public_key()).is_err());
    }

    #[test]
    fn test_from_hex_rejects_wrong_length() {
        let short = hex::encode([7u8; 32]);
        assert!(matches!(
            Signature::from_hex(&short),
            Err(CryptoError::InvalidInput(_))
        ));
        assert!(Signature::from_hex("not hex").is_err());
    }
}

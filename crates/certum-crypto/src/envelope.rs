//! Signed request envelopes.
//!
//! The caller identity of a mutating request is the Ed25519 key that signed
//! it. The signature covers a domain tag followed by the canonical JSON of
//! the payload (object keys sorted), so a client and the node agree on the
//! signed bytes regardless of field order on the wire.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use certum_core::Identity;

use crate::error::CryptoError;
use crate::keys::{KeyPair, PublicKey};
use crate::signing::{self, Signature};

pub(crate) const DOMAIN_TAG: &[u8] = b"certum/v1/request:";

/// A payload together with the identity and signature of its sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedEnvelope {
    pub payload: serde_json::Value,
    pub signer: Identity,
    /// Hex-encoded Ed25519 signature.
    pub signature: String,
}

pub(crate) fn signing_bytes(payload: &serde_json::Value) -> Result<Vec<u8>, CryptoError> {
    let mut bytes = DOMAIN_TAG.to_vec();
    bytes.extend_from_slice(&serde_json::to_vec(payload)?);
    Ok(bytes)
}

impl SignedEnvelope {
    /// Sign `payload` with `keypair`.
    pub fn seal<T: Serialize>(payload: &T, keypair: &KeyPair) -> Result<Self, CryptoError> {
        let payload = serde_json::to_value(payload)?;
        let sig = signing::sign(&signing_bytes(&payload)?, keypair);
        Ok(Self {
            payload,
            signer: keypair.identity(),
            signature: sig.to_hex(),
        })
    }

    /// Verify the signature and decode the payload.
    ///
    /// Returns the authenticated signer alongside the payload.
    pub fn open<T: DeserializeOwned>(&self) -> Result<(Identity, T), CryptoError> {
        let pubkey = PublicKey::from_identity(&self.signer)?;
        let sig = Signature::from_hex(&self.signature)?;
        signing::verify(&signing_bytes(&self.payload)?, &sig, &pubkey)?;
        let payload = serde_json::from_value(self.payload.clone())?;
        Ok((self.signer, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Revoke {
        id: String,
    }

    #[test]
    fn test_seal_and_open() {
        let kp = KeyPair::generate();
        let env = SignedEnvelope::seal(&Revoke { id: "cert1".into() }, &kp).unwrap();
        let (signer, payload): (Identity, Revoke) = env.open().unwrap();
        assert_eq!(signer, kp.identity());
        assert_eq!(payload, Revoke { id: "cert1".into() });
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let kp = KeyPair::generate();
        let mut env = SignedEnvelope::seal(&Revoke { id: "cert1".into() }, &kp).unwrap();
        env.payload = serde_json::json!({"id": "cert2"});
        assert!(matches!(
            env.open::<Revoke>(),
            Err(CryptoError::SignatureVerificationFailed)
        ));
    }

    #[test]
    fn test_swapped_signer_rejected() {
        let kp = KeyPair::generate();
        let other = KeyPair::generate();
        let mut env = SignedEnvelope::seal(&Revoke { id: "cert1".into() }, &kp).unwrap();
        env.signer = other.identity();
        assert!(env.open::<Revoke>().is_err());
    }

    #[test]
    fn test_survives_json_transport() {
        let kp = KeyPair::generate();
        let env = SignedEnvelope::seal(&Revoke { id: "cert1".into() }, &kp).unwrap();
        let wire = serde_json::to_string(&env).unwrap();
        let back: SignedEnvelope = serde_json::from_str(&wire).unwrap();
        let (signer, _): (Identity, Revoke) = back.open().unwrap();
        assert_eq!(signer, kp.identity());
    }

    #[test]
    fn test_malformed_signature_rejected() {
        let kp = KeyPair::generate();
        let mut env = SignedEnvelope::seal(&Revoke { id: "cert1".into() }, &kp).unwrap();
        env.signature = "zz".into();
        assert!(matches!(
            env.open::<Revoke>(),
            Err(CryptoError::InvalidInput(_))
        ));
    }
}

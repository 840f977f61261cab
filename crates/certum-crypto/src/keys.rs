use ed25519_dalek::{SigningKey, VerifyingKey, SECRET_KEY_LENGTH};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use certum_core::Identity;

use crate::error::CryptoError;

/// Ed25519 keypair of a registry caller.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Derive a keypair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Parse a hex-encoded 32-byte secret key.
    pub fn from_secret_hex(input: &str) -> Result<Self, CryptoError> {
        let stripped = input.trim();
        let stripped = stripped.strip_prefix("0x").unwrap_or(stripped);
        let bytes = Zeroizing::new(
            hex::decode(stripped).map_err(|e| CryptoError::InvalidInput(e.to_string()))?,
        );
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(CryptoError::InvalidKeyLength {
                expected: SECRET_KEY_LENGTH,
                actual: bytes.len(),
            });
        }
        let mut seed = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
        seed.copy_from_slice(&bytes);
        Ok(Self::from_seed(&seed))
    }

    /// Hex encoding of the secret key.
    pub fn secret_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.signing_key.to_bytes()))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            verifying_key: self.signing_key.verifying_key(),
        }
    }

    /// The registry identity of this keypair.
    pub fn identity(&self) -> Identity {
        self.public_key().identity()
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

/// Ed25519 public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    verifying_key: VerifyingKey,
}

impl PublicKey {
    /// Interpret an identity as a verifying key.
    pub fn from_identity(identity: &Identity) -> Result<Self, CryptoError> {
        let verifying_key = VerifyingKey::from_bytes(identity.as_bytes())
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        Ok(Self { verifying_key })
    }

    pub fn identity(&self) -> Identity {
        Identity::from_bytes(self.verifying_key.to_bytes())
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}

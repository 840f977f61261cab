//! Holder commitments.
//!
//! A holder hash is `BLAKE3("<student number>|<NAME>|<salt hex>")`. The
//! registry only ever sees the digest. The salt is generated fresh for every
//! issuance and handed back to the caller; nothing stores it. Losing the
//! salt makes the certificate permanently unverifiable, since the
//! commitment cannot be reproduced from the identity fields alone.

use std::fmt;

use certum_core::HolderHash;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;
use crate::hashing;

/// Salt width in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Per-issuance random salt.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Draw a fresh salt from the operating system RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a `0x`-prefixed (or bare) hex salt.
    pub fn from_hex(input: &str) -> Result<Self, CryptoError> {
        let stripped = input.trim();
        let stripped = stripped.strip_prefix("0x").unwrap_or(stripped);
        let bytes = hex::decode(stripped).map_err(|e| CryptoError::InvalidSalt(e.to_string()))?;
        let bytes: [u8; SALT_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
            CryptoError::InvalidSalt(format!("expected {} bytes, got {}", SALT_LEN, b.len()))
        })?;
        Ok(Self(bytes))
    }

    /// Lowercase `0x`-prefixed hex, the form that enters the commitment.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Salt(<redacted>)")
    }
}

/// Canonical form of a name field: trimmed and uppercased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Compute the holder hash for the given identity fields and salt.
pub fn commit(student_number: &str, name: &str, salt: &Salt) -> HolderHash {
    let name = normalize_name(name);
    let salt_hex = salt.to_hex();
    let digest = hashing::hash_joined(&[student_number.trim(), &name, &salt_hex]);
    HolderHash::from_bytes(digest)
}

/// A freshly generated commitment and the salt needed to reproduce it.
#[derive(Debug, Clone)]
pub struct HolderCommitment {
    pub holder_hash: HolderHash,
    pub salt: Salt,
}

impl HolderCommitment {
    /// Generate a new salt and commit to the identity fields.
    pub fn generate(student_number: &str, name: &str) -> Self {
        let salt = Salt::generate();
        let holder_hash = commit(student_number, name, &salt);
        tracing::debug!(holder_hash = %holder_hash, "holder commitment generated");
        Self { holder_hash, salt }
    }

    /// Recompute the commitment from identity fields and check it matches.
    pub fn matches(&self, student_number: &str, name: &str) -> bool {
        commit(student_number, name, &self.salt) == self.holder_hash
    }
}

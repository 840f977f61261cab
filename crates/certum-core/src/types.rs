use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Width in bytes of a canonical certificate identifier.
pub const ID_LEN: usize = 32;

/// Width in bytes of a holder commitment digest.
pub const DIGEST_LEN: usize = 32;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// `expires_at` sentinel meaning the certificate never expires.
pub const NEVER_EXPIRES: Timestamp = 0;

fn decode_fixed<const N: usize>(input: &str) -> Result<[u8; N], String> {
    let stripped = input.strip_prefix("0x").unwrap_or(input);
    let bytes = hex::decode(stripped).map_err(|e| format!("invalid hex: {}", e))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| format!("expected {} bytes, got {}", N, b.len()))
}

/// Fixed-width certificate identifier.
///
/// Canonicalized from a human-readable label: the label's UTF-8 bytes,
/// truncated to 32 bytes on a character boundary and right-padded with
/// zeros. Two labels with the same canonical bytes name the same
/// certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CertificateId([u8; ID_LEN]);

impl CertificateId {
    /// Canonicalize a label into an identifier.
    pub fn from_label(label: &str) -> Result<Self, CoreError> {
        if label.is_empty() {
            return Err(CoreError::InvalidIdentifier(
                "label must not be empty".into(),
            ));
        }
        let mut end = label.len().min(ID_LEN);
        while !label.is_char_boundary(end) {
            end -= 1;
        }
        let mut bytes = [0u8; ID_LEN];
        bytes[..end].copy_from_slice(&label.as_bytes()[..end]);
        Ok(Self(bytes))
    }

    /// Wrap raw identifier bytes.
    pub fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a `0x`-prefixed (or bare) 64-character hex identifier.
    pub fn from_hex(input: &str) -> Result<Self, CoreError> {
        decode_fixed::<ID_LEN>(input)
            .map(Self)
            .map_err(CoreError::InvalidIdentifier)
    }

    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// `0x`-prefixed hex encoding of the raw bytes.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Recover the label, dropping the zero padding.
    pub fn label(&self) -> String {
        let end = self
            .0
            .iter()
            .rposition(|b| *b != 0)
            .map(|i| i + 1)
            .unwrap_or(0);
        String::from_utf8_lossy(&self.0[..end]).into_owned()
    }
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl TryFrom<String> for CertificateId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<CertificateId> for String {
    fn from(id: CertificateId) -> Self {
        id.to_hex()
    }
}

/// 256-bit commitment binding a holder's identity fields and salt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HolderHash([u8; DIGEST_LEN]);

impl HolderHash {
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a `0x`-prefixed (or bare) hex digest.
    pub fn from_hex(input: &str) -> Result<Self, CoreError> {
        decode_fixed::<DIGEST_LEN>(input)
            .map(Self)
            .map_err(CoreError::InvalidDigest)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for HolderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for HolderHash {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<HolderHash> for String {
    fn from(hash: HolderHash) -> Self {
        hash.to_hex()
    }
}

/// Identity of a caller: the raw bytes of its Ed25519 verifying key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity([u8; 32]);

impl Identity {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a 64-character hex identity (an optional `0x` prefix is accepted).
    pub fn from_hex(input: &str) -> Result<Self, CoreError> {
        decode_fixed::<32>(input)
            .map(Self)
            .map_err(CoreError::InvalidIdentity)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for Identity {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.to_hex()
    }
}

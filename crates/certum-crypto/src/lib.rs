//! Certum Crypto: Holder commitments, salts, Ed25519 keys and signed
//! request envelopes.

pub mod commitment;
pub mod envelope;
pub mod error;
pub mod hashing;
pub mod keys;
pub mod signing;

pub use commitment::{commit, normalize_name, HolderCommitment, Salt, SALT_LEN};
pub use envelope::SignedEnvelope;
pub use error::CryptoError;
pub use hashing::{hash, Hash};
pub use keys::{KeyPair, PublicKey};
pub use signing::{sign, verify, Signature};

/// Cryptographic operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("signature verification failed")]
    SignatureVerificationFailed,

    #[error("invalid salt: {0}")]
    InvalidSalt(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("payload encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

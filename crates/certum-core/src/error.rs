use crate::certificate_state::CertificateState;

/// Core protocol errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        from: CertificateState,
        to: CertificateState,
    },

    #[error("invalid certificate identifier: {0}")]
    InvalidIdentifier(String),

    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("validation error: {0}")]
    ValidationError(String),
}

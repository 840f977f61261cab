use certum_core::{CertificateId, Identity};

/// Registry errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unauthorized: {caller} is not the registry authority")]
    Unauthorized { caller: Identity },

    #[error("duplicate certificate id: {0}")]
    DuplicateId(CertificateId),

    #[error("certificate not found: {0}")]
    NotFound(CertificateId),

    #[error("certificate already revoked: {0}")]
    AlreadyRevoked(CertificateId),

    #[error("substrate unavailable: {0}")]
    SubstrateUnavailable(String),

    #[error("core error: {0}")]
    Core(#[from] certum_core::CoreError),
}

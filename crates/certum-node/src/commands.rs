//! Commands dispatched from the HTTP API to the node event loop.

use serde::Serialize;
use tokio::sync::oneshot;

use certum_core::CertificateEvent;
use certum_crypto::SignedEnvelope;
use certum_registry::RegistryError;

/// A command sent from the HTTP API to the node's main event loop.
pub enum NodeCommand {
    /// Apply a signed mutation. `expected` is the operation the endpoint
    /// accepts; an envelope carrying a different one is rejected.
    Apply {
        envelope: SignedEnvelope,
        expected: CertificateEvent,
        reply: oneshot::Sender<Result<MutationResponse, CommandError>>,
    },
}

/// Why the event loop rejected a command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The request itself is malformed or badly signed.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Response after a committed mutation.
#[derive(Debug, Clone, Serialize)]
pub struct MutationResponse {
    pub certificate_id: String,
    pub label: String,
    pub sequence: u64,
    pub committed_at: u64,
    pub changed: bool,
    pub status: String,
}

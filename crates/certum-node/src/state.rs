//! Shared state between the HTTP API and the node event loop.

use std::time::Instant;
use tokio::sync::mpsc;

use certum_core::Identity;
use certum_registry::CertificateRegistry;

use crate::commands::NodeCommand;

/// State handed to every HTTP handler.
///
/// Reads go straight to the registry; mutations are sent to the event
/// loop over `command_tx`.
pub struct NodeState {
    pub authority: Identity,
    pub registry: CertificateRegistry,
    pub command_tx: mpsc::Sender<NodeCommand>,
    pub start_time: Instant,
}

impl NodeState {
    pub fn new(registry: CertificateRegistry, command_tx: mpsc::Sender<NodeCommand>) -> Self {
        Self {
            authority: registry.authority(),
            registry,
            command_tx,
            start_time: Instant::now(),
        }
    }
}

//! The Certum node orchestrator.
//!
//! Opens the ledger, runs the HTTP API in a background task and owns the
//! single event loop every mutation passes through.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use certum_core::{CertificateEvent, Identity, Mutation};
use certum_crypto::SignedEnvelope;
use certum_registry::{CertificateRegistry, SystemClock};

use crate::commands::{CommandError, MutationResponse, NodeCommand};
use crate::config::CertumConfig;
use crate::state::NodeState;
use crate::storage::RocksLedger;

/// A registry node serving one authority.
pub struct CertumNode {
    /// Node configuration.
    config: CertumConfig,
    /// The only identity allowed to mutate the registry.
    authority: Identity,
    /// The registry over the RocksDB ledger (set by `start`).
    registry: Option<CertificateRegistry>,
    /// Shared state accessible from HTTP handlers.
    node_state: Option<Arc<NodeState>>,
    /// Receives commands from the HTTP API.
    command_rx: Option<mpsc::Receiver<NodeCommand>>,
    /// Address the API server actually bound to.
    api_addr: Option<SocketAddr>,
}

impl CertumNode {
    /// Create a new node with the given config.
    pub fn new(config: CertumConfig) -> Result<Self> {
        let authority = config.authority()?;
        tracing::info!(authority = %authority.to_hex(), "Certum node created");

        Ok(Self {
            config,
            authority,
            registry: None,
            node_state: None,
            command_rx: None,
            api_addr: None,
        })
    }

    /// Open storage and start the HTTP API.
    pub async fn start(&mut self) -> Result<()> {
        tracing::info!("starting Certum node");

        let ledger = RocksLedger::open(&self.config.storage.data_dir, &self.authority)?;
        tracing::info!(path = %self.config.storage.data_dir.display(), "storage initialized");

        let registry = CertificateRegistry::new(
            self.authority,
            Arc::new(ledger),
            Arc::new(SystemClock),
            self.config.registry.policy,
        );

        // HTTP API → main event loop
        let (command_tx, command_rx) = mpsc::channel::<NodeCommand>(256);
        let node_state = Arc::new(NodeState::new(registry.clone(), command_tx));

        let listener = TcpListener::bind(self.config.api_addr()).await?;
        let api_addr = listener.local_addr()?;

        let api_state = node_state.clone();
        tokio::spawn(async move {
            if let Err(e) = crate::api::start_api_server(listener, api_state).await {
                tracing::error!(error = %e, "HTTP API server error");
            }
        });

        self.registry = Some(registry);
        self.node_state = Some(node_state);
        self.command_rx = Some(command_rx);
        self.api_addr = Some(api_addr);

        Ok(())
    }

    /// Run the node's main event loop until the command channel closes.
    pub async fn run(&mut self) -> Result<()> {
        let mut command_rx = self
            .command_rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("node not started"))?;
        let registry = self
            .registry
            .clone()
            .ok_or_else(|| anyhow::anyhow!("node not started"))?;

        tracing::info!("entering main event loop");

        while let Some(cmd) = command_rx.recv().await {
            Self::handle_command(cmd, &registry);
        }

        tracing::info!("API command channel closed");
        Ok(())
    }

    /// Gracefully shut down the node.
    pub async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("shutting down Certum node");

        self.node_state = None;
        self.command_rx = None;
        if self.registry.take().is_some() {
            tracing::info!("storage closed");
        }

        tracing::info!("Certum node shut down");
        Ok(())
    }

    /// The configured authority.
    pub fn authority(&self) -> Identity {
        self.authority
    }

    /// Bound API address, once started.
    pub fn api_addr(&self) -> Option<SocketAddr> {
        self.api_addr
    }

    /// Handle a command from the HTTP API.
    pub(crate) fn handle_command(cmd: NodeCommand, registry: &CertificateRegistry) {
        match cmd {
            NodeCommand::Apply {
                envelope,
                expected,
                reply,
            } => {
                let result = Self::apply_envelope(registry, &envelope, expected);
                if let Err(e) = &result {
                    tracing::debug!(error = %e, "mutation rejected");
                }
                if reply.send(result).is_err() {
                    tracing::debug!("client dropped before mutation reply");
                }
            }
        }
    }

    fn apply_envelope(
        registry: &CertificateRegistry,
        envelope: &SignedEnvelope,
        expected: CertificateEvent,
    ) -> Result<MutationResponse, CommandError> {
        let (caller, mutation) = envelope
            .open::<Mutation>()
            .map_err(|e| CommandError::BadRequest(e.to_string()))?;

        if mutation.event() != expected {
            return Err(CommandError::BadRequest(format!(
                "envelope carries a {} request",
                event_name(mutation.event())
            )));
        }

        let id = mutation.id();
        let receipt = registry.apply(&caller, mutation)?;

        let status = match (expected, receipt.changed) {
            (CertificateEvent::Issue, _) => "issued",
            (CertificateEvent::Revoke, true) => "revoked",
            (CertificateEvent::Revoke, false) => "already_revoked",
        };

        Ok(MutationResponse {
            certificate_id: id.to_hex(),
            label: id.label(),
            sequence: receipt.sequence,
            committed_at: receipt.committed_at,
            changed: receipt.changed,
            status: status.into(),
        })
    }
}

fn event_name(event: CertificateEvent) -> &'static str {
    match event {
        CertificateEvent::Issue => "issue",
        CertificateEvent::Revoke => "revoke",
    }
}

//! HTTP API server for the Certum node.
//!
//! Provides REST endpoints for node status, the registry authority,
//! certificate lookup and verification, signed issuance and revocation,
//! and the mutation journal.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

use certum_core::{
    CertificateEvent, CertificateId, CertificateRecord, HolderHash, Verification,
};
use certum_crypto::SignedEnvelope;
use certum_registry::{JournalEntry, RegistryError};

use crate::commands::{CommandError, MutationResponse, NodeCommand};
use crate::state::NodeState;

const DEFAULT_JOURNAL_PAGE: usize = 100;
const MAX_JOURNAL_PAGE: usize = 1000;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

// --- Response types ---

#[derive(Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub authority: String,
    pub record_count: usize,
    pub journal_length: u64,
    pub uptime_secs: u64,
}

#[derive(Serialize)]
pub struct AuthorityResponse {
    pub authority: String,
}

#[derive(Serialize, Deserialize)]
pub struct CertificateView {
    pub certificate_id: String,
    pub label: String,
    pub holder_hash: HolderHash,
    pub title: String,
    pub issuer: String,
    pub issued_at: u64,
    pub expires_at: u64,
    pub revoked: bool,
}

impl From<CertificateRecord> for CertificateView {
    fn from(record: CertificateRecord) -> Self {
        Self {
            certificate_id: record.id.to_hex(),
            label: record.id.label(),
            holder_hash: record.holder_hash,
            title: record.title,
            issuer: record.issuer,
            issued_at: record.issued_at,
            expires_at: record.expires_at,
            revoked: record.revoked,
        }
    }
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    /// Certificate label.
    pub id: String,
    /// Claimed holder hash, hex.
    pub holder_hash: String,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub certificate_id: String,
    #[serde(flatten)]
    pub verification: Verification,
}

#[derive(Deserialize)]
pub struct JournalQuery {
    pub from: Option<u64>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct JournalResponse {
    pub entries: Vec<JournalEntry>,
    pub head: u64,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

fn error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn registry_error(e: RegistryError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &e {
        RegistryError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        RegistryError::DuplicateId(_) | RegistryError::AlreadyRevoked(_) => StatusCode::CONFLICT,
        RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
        RegistryError::SubstrateUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        RegistryError::Core(_) => StatusCode::BAD_REQUEST,
    };
    error(status, e.to_string())
}

fn command_error(e: CommandError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        CommandError::BadRequest(msg) => error(StatusCode::BAD_REQUEST, msg),
        CommandError::Registry(e) => registry_error(e),
    }
}

fn parse_label(label: &str) -> Result<CertificateId, (StatusCode, Json<ErrorResponse>)> {
    CertificateId::from_label(label).map_err(|e| error(StatusCode::BAD_REQUEST, e.to_string()))
}

// --- Handlers ---

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

async fn handle_status(State(state): State<Arc<NodeState>>) -> ApiResult<StatusResponse> {
    Ok(Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        authority: state.authority.to_hex(),
        record_count: state.registry.record_count().map_err(registry_error)?,
        journal_length: state.registry.head().map_err(registry_error)?,
        uptime_secs: state.start_time.elapsed().as_secs(),
    }))
}

async fn handle_authority(State(state): State<Arc<NodeState>>) -> Json<AuthorityResponse> {
    Json(AuthorityResponse {
        authority: state.authority.to_hex(),
    })
}

async fn handle_get_certificate(
    State(state): State<Arc<NodeState>>,
    Path(label): Path<String>,
) -> ApiResult<CertificateView> {
    let id = parse_label(&label)?;
    let record = state.registry.get(&id).map_err(registry_error)?;
    Ok(Json(record.into()))
}

async fn handle_verify(
    State(state): State<Arc<NodeState>>,
    Json(req): Json<VerifyRequest>,
) -> ApiResult<VerifyResponse> {
    let id = parse_label(&req.id)?;
    let claimed = HolderHash::from_hex(&req.holder_hash)
        .map_err(|e| error(StatusCode::BAD_REQUEST, e.to_string()))?;
    let verification = state.registry.verify(&id, &claimed).map_err(registry_error)?;
    Ok(Json(VerifyResponse {
        certificate_id: id.to_hex(),
        verification,
    }))
}

async fn handle_issue(
    State(state): State<Arc<NodeState>>,
    Json(envelope): Json<SignedEnvelope>,
) -> ApiResult<MutationResponse> {
    send_mutation(&state, envelope, CertificateEvent::Issue).await
}

async fn handle_revoke(
    State(state): State<Arc<NodeState>>,
    Json(envelope): Json<SignedEnvelope>,
) -> ApiResult<MutationResponse> {
    send_mutation(&state, envelope, CertificateEvent::Revoke).await
}

async fn handle_journal(
    State(state): State<Arc<NodeState>>,
    Query(query): Query<JournalQuery>,
) -> ApiResult<JournalResponse> {
    let from = query.from.unwrap_or(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_JOURNAL_PAGE)
        .min(MAX_JOURNAL_PAGE);
    let entries = state
        .registry
        .journal(from, limit)
        .map_err(registry_error)?;
    let head = state.registry.head().map_err(registry_error)?;
    Ok(Json(JournalResponse { entries, head }))
}

/// Send a mutation to the event loop and await the reply.
async fn send_mutation(
    state: &Arc<NodeState>,
    envelope: SignedEnvelope,
    expected: CertificateEvent,
) -> ApiResult<MutationResponse> {
    let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();

    let cmd = NodeCommand::Apply {
        envelope,
        expected,
        reply: reply_tx,
    };

    state.command_tx.send(cmd).await.map_err(|_| {
        error(
            StatusCode::SERVICE_UNAVAILABLE,
            "node event loop not running",
        )
    })?;

    match reply_rx.await {
        Ok(Ok(resp)) => Ok(Json(resp)),
        Ok(Err(e)) => Err(command_error(e)),
        Err(_) => Err(error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "event loop dropped the reply channel",
        )),
    }
}

// --- Server ---

pub fn build_router(state: Arc<NodeState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(handle_health))
        .route("/api/v1/status", get(handle_status))
        .route("/api/v1/authority", get(handle_authority))
        .route("/api/v1/journal", get(handle_journal))
        .route("/api/v1/certificates/issue", post(handle_issue))
        .route("/api/v1/certificates/revoke", post(handle_revoke))
        .route("/api/v1/certificates/verify", post(handle_verify))
        .route(
            "/api/v1/certificates/by-label/{id}",
            get(handle_get_certificate),
        )
        .with_state(state)
}

pub async fn start_api_server(listener: TcpListener, state: Arc<NodeState>) -> anyhow::Result<()> {
    let listen_addr = listener.local_addr()?;
    let app = build_router(state);
    tracing::info!(%listen_addr, "HTTP API server started");
    axum::serve(listener, app).await?;
    Ok(())
}

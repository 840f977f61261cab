pub mod identity;
pub mod issue;
pub mod revoke;
pub mod show;
pub mod status;
pub mod verify;

use certum_crypto::KeyPair;
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:9101";

#[derive(Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response after a committed issue or revoke.
#[derive(Deserialize)]
pub struct MutationResponse {
    pub certificate_id: String,
    pub label: String,
    pub sequence: u64,
    pub committed_at: u64,
    pub status: String,
}

/// Load the signing key from `--secret-key` / `CERTUM_SECRET_KEY`.
pub fn load_keypair(secret_key: Option<&str>) -> anyhow::Result<KeyPair> {
    let hex = secret_key.ok_or_else(|| {
        anyhow::anyhow!("no secret key: pass --secret-key or set CERTUM_SECRET_KEY")
    })?;
    KeyPair::from_secret_hex(hex.trim()).map_err(|e| anyhow::anyhow!("invalid secret key: {}", e))
}

/// Turn a non-success response into an error carrying the node's message.
pub async fn fail(action: &str, r: reqwest::Response) -> anyhow::Error {
    let status = r.status();
    match r.json::<ErrorResponse>().await {
        Ok(err) => anyhow::anyhow!("{} failed (HTTP {}): {}", action, status, err.error),
        Err(_) => anyhow::anyhow!("{} failed (HTTP {})", action, status),
    }
}

/// Print a hint for an unreachable node and return the error to propagate.
pub fn report_unreachable(endpoint: &str, e: reqwest::Error) -> anyhow::Error {
    eprintln!("Is the node running? Start it with: certum-node");
    anyhow::anyhow!("could not reach node at {}: {}", endpoint, e)
}

//! `certum revoke`: Revoke a certificate.

use clap::Args;

use certum_core::{CertificateId, Mutation};
use certum_crypto::SignedEnvelope;

use super::{fail, load_keypair, report_unreachable, MutationResponse, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct RevokeArgs {
    /// Certificate identifier.
    pub id: String,

    /// Authority secret key (hex).
    #[arg(long, env = "CERTUM_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

pub async fn run(args: &RevokeArgs) -> anyhow::Result<()> {
    let keypair = load_keypair(args.secret_key.as_deref())?;
    let id = CertificateId::from_label(&args.id)?;
    let envelope = SignedEnvelope::seal(&Mutation::Revoke { id }, &keypair)?;

    let url = format!("{}/api/v1/certificates/revoke", args.endpoint);
    let client = reqwest::Client::new();
    let resp = client.post(&url).json(&envelope).send().await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: MutationResponse = r.json().await?;
            if data.status == "already_revoked" {
                println!("Certificate was already revoked.");
            } else {
                println!("Certificate revoked.");
            }
            println!("  ID:        {} ({})", data.label, data.certificate_id);
            println!("  Sequence:  {}", data.sequence);
        }
        Ok(r) => return Err(fail("revocation", r).await),
        Err(e) => return Err(report_unreachable(&args.endpoint, e)),
    }

    Ok(())
}

//! `certum issue`: Issue a certificate bound to a holder commitment.

use clap::Args;

use certum_core::{CertificateId, Mutation, NewCertificate, NEVER_EXPIRES};
use certum_crypto::{HolderCommitment, KeyPair, SignedEnvelope};

use super::{fail, load_keypair, report_unreachable, MutationResponse, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Certificate identifier (up to 32 bytes).
    pub id: String,

    /// Holder's student number.
    pub student_number: String,

    /// Holder's full name.
    pub name: String,

    /// Certificate title.
    pub title: String,

    /// Issuing institution.
    pub issuer: String,

    /// Expiry as Unix seconds; 0 never expires.
    #[arg(long, default_value_t = NEVER_EXPIRES)]
    pub expires_at: u64,

    /// Authority secret key (hex).
    #[arg(long, env = "CERTUM_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

/// Build the signed issue request and the commitment it carries.
pub fn prepare(
    args: &IssueArgs,
    keypair: &KeyPair,
) -> anyhow::Result<(SignedEnvelope, HolderCommitment)> {
    let id = CertificateId::from_label(&args.id)?;
    let commitment = HolderCommitment::generate(&args.student_number, &args.name);
    anyhow::ensure!(
        commitment.matches(&args.student_number, &args.name),
        "holder commitment does not reproduce from the given student number and name"
    );
    let mutation = Mutation::Issue(NewCertificate {
        id,
        holder_hash: commitment.holder_hash,
        title: args.title.clone(),
        issuer: args.issuer.clone(),
        expires_at: args.expires_at,
    });
    let envelope = SignedEnvelope::seal(&mutation, keypair)?;
    Ok((envelope, commitment))
}

pub async fn run(args: &IssueArgs) -> anyhow::Result<()> {
    let keypair = load_keypair(args.secret_key.as_deref())?;
    let (envelope, commitment) = prepare(args, &keypair)?;

    let url = format!("{}/api/v1/certificates/issue", args.endpoint);
    let client = reqwest::Client::new();
    let resp = client.post(&url).json(&envelope).send().await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: MutationResponse = r.json().await?;
            println!("Certificate issued!");
            println!("  ID:           {} ({})", data.label, data.certificate_id);
            println!("  Holder hash:  {}", commitment.holder_hash);
            println!("  Sequence:     {}", data.sequence);
            println!("  Issued at:    {}", data.committed_at);
            println!("  Status:       {}", data.status);
            println!();
            println!("  Salt:         {}", commitment.salt.to_hex());
            println!();
            println!("SAVE THIS SALT. It is not stored anywhere and the holder");
            println!("needs it, with their student number and name, to verify.");
        }
        Ok(r) => return Err(fail("issuance", r).await),
        Err(e) => return Err(report_unreachable(&args.endpoint, e)),
    }

    Ok(())
}

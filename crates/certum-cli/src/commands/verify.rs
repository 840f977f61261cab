//! `certum verify`: Verify a holder's claim to a certificate.

use clap::Args;
use serde::{Deserialize, Serialize};

use certum_crypto::{commit, Salt};

use super::{fail, report_unreachable, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Certificate identifier.
    pub id: String,

    /// Holder's student number.
    pub student_number: String,

    /// Holder's full name.
    pub name: String,

    /// Salt printed at issuance (hex).
    pub salt: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Serialize)]
struct VerifyRequest {
    id: String,
    holder_hash: String,
}

#[derive(Deserialize)]
struct VerifyResponse {
    valid: bool,
    is_revoked: bool,
    issued_at: u64,
    expires_at: u64,
    title: String,
    issuer: String,
    #[serde(default)]
    checks: Vec<VerifyCheck>,
}

#[derive(Deserialize)]
struct VerifyCheck {
    name: String,
    passed: bool,
}

pub async fn run(args: &VerifyArgs) -> anyhow::Result<()> {
    let salt = Salt::from_hex(&args.salt).map_err(|e| anyhow::anyhow!("invalid salt: {}", e))?;
    let holder_hash = commit(&args.student_number, &args.name, &salt);

    let url = format!("{}/api/v1/certificates/verify", args.endpoint);
    let body = VerifyRequest {
        id: args.id.clone(),
        holder_hash: holder_hash.to_hex(),
    };

    let client = reqwest::Client::new();
    let resp = client.post(&url).json(&body).send().await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: VerifyResponse = r.json().await?;
            if data.valid {
                println!("Certificate is VALID");
            } else if data.is_revoked {
                println!("Certificate is REVOKED");
            } else {
                println!("Certificate is INVALID");
            }
            if !data.title.is_empty() {
                println!("  Title:      {}", data.title);
                println!("  Issuer:     {}", data.issuer);
                println!("  Issued at:  {}", data.issued_at);
                if data.expires_at == 0 {
                    println!("  Expires:    never");
                } else {
                    println!("  Expires:    {}", data.expires_at);
                }
            }
            println!();
            for check in &data.checks {
                let icon = if check.passed { "PASS" } else { "FAIL" };
                println!("  [{}] {}", icon, check.name);
            }
        }
        Ok(r) => return Err(fail("verification", r).await),
        Err(e) => return Err(report_unreachable(&args.endpoint, e)),
    }

    Ok(())
}

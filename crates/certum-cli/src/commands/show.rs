//! `certum show`: Show the stored record of a certificate.

use clap::Args;
use serde::Deserialize;

use super::{fail, report_unreachable, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Certificate identifier.
    pub id: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct CertificateView {
    certificate_id: String,
    label: String,
    holder_hash: String,
    title: String,
    issuer: String,
    issued_at: u64,
    expires_at: u64,
    revoked: bool,
}

/// Lookup URL for a label, with the label as a single encoded path segment.
fn lookup_url(endpoint: &str, label: &str) -> anyhow::Result<reqwest::Url> {
    let mut url = reqwest::Url::parse(endpoint)?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("endpoint cannot carry a path: {}", endpoint))?
        .pop_if_empty()
        .extend(["api", "v1", "certificates", "by-label"])
        .push(label);
    Ok(url)
}

pub async fn run(args: &ShowArgs) -> anyhow::Result<()> {
    let url = lookup_url(&args.endpoint, &args.id)?;
    let resp = reqwest::get(url).await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let cert: CertificateView = r.json().await?;
            println!("Certificate {}:", cert.label);
            println!("  ID:           {}", cert.certificate_id);
            println!("  Holder hash:  {}", cert.holder_hash);
            println!("  Title:        {}", cert.title);
            println!("  Issuer:       {}", cert.issuer);
            println!("  Issued at:    {}", cert.issued_at);
            if cert.expires_at == 0 {
                println!("  Expires:      never");
            } else {
                println!("  Expires:      {}", cert.expires_at);
            }
            println!("  Revoked:      {}", cert.revoked);
        }
        Ok(r) => return Err(fail("lookup", r).await),
        Err(e) => return Err(report_unreachable(&args.endpoint, e)),
    }

    Ok(())
}

//! `certum status`: Query the status of a running Certum node.

use clap::Args;
use serde::Deserialize;

use super::{report_unreachable, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    version: String,
    authority: String,
    record_count: usize,
    journal_length: u64,
    uptime_secs: u64,
}

pub async fn run(args: &StatusArgs) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/status", args.endpoint);
    let resp = reqwest::get(&url).await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let status: StatusResponse = r.json().await?;
            println!("Node Status:");
            println!("  Version:       {}", status.version);
            println!("  Authority:     {}", status.authority);
            println!("  Certificates:  {}", status.record_count);
            println!("  Journal:       {} entries", status.journal_length);
            println!("  Uptime:        {}s", status.uptime_secs);
        }
        Ok(r) => {
            anyhow::bail!("node returned HTTP {}", r.status());
        }
        Err(e) => return Err(report_unreachable(&args.endpoint, e)),
    }

    Ok(())
}

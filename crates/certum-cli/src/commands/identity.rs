//! `certum identity`: Show or generate a signing identity.

use clap::Args;
use serde::Deserialize;

use certum_crypto::KeyPair;

use super::{load_keypair, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct IdentityArgs {
    /// Generate a fresh keypair and print it.
    #[arg(long)]
    pub generate: bool,

    /// Secret key (hex) to derive the identity from.
    #[arg(long, env = "CERTUM_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct AuthorityResponse {
    authority: String,
}

pub async fn run(args: &IdentityArgs) -> anyhow::Result<()> {
    if args.generate {
        let keypair = KeyPair::generate();
        println!("New identity:");
        println!("  Public key:  {}", keypair.identity().to_hex());
        println!("  Secret key:  {}", keypair.secret_hex().as_str());
        println!();
        println!("Keep the secret key private. Export it as CERTUM_SECRET_KEY");
        println!("and set the public key as registry.authority in certum.toml.");
        return Ok(());
    }

    let keypair = load_keypair(args.secret_key.as_deref())?;
    let identity = keypair.identity();
    println!("Identity:");
    println!("  Public key:  {}", identity.to_hex());

    let url = format!("{}/api/v1/authority", args.endpoint);
    match reqwest::get(&url).await {
        Ok(r) if r.status().is_success() => {
            let data: AuthorityResponse = r.json().await?;
            let is_authority = data.authority.eq_ignore_ascii_case(&identity.to_hex());
            println!("  Authority:   {}", data.authority);
            println!(
                "  Can mutate:  {}",
                if is_authority { "yes" } else { "no" }
            );
        }
        Ok(r) => {
            anyhow::bail!("node returned HTTP {}", r.status());
        }
        Err(e) => {
            tracing::debug!(error = %e, "node unreachable");
            println!("  Authority:   (node unreachable at {})", args.endpoint);
        }
    }

    Ok(())
}

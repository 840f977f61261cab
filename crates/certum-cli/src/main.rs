//! Certum CLI: Command-line client for the certificate registry.
//!
//! Subcommands: issue, verify, revoke, show, status, identity.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Certum: Privacy-preserving certificate registry.
#[derive(Parser, Debug)]
#[command(name = "certum", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Issue a certificate bound to a holder commitment.
    Issue(commands::issue::IssueArgs),
    /// Verify a holder's claim to a certificate.
    Verify(commands::verify::VerifyArgs),
    /// Revoke a certificate.
    Revoke(commands::revoke::RevokeArgs),
    /// Show the stored record of a certificate.
    Show(commands::show::ShowArgs),
    /// Query the status of a running node.
    Status(commands::status::StatusArgs),
    /// Show or generate a signing identity.
    Identity(commands::identity::IdentityArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Issue(args) => commands::issue::run(args).await,
        Commands::Verify(args) => commands::verify::run(args).await,
        Commands::Revoke(args) => commands::revoke::run(args).await,
        Commands::Show(args) => commands::show::run(args).await,
        Commands::Status(args) => commands::status::run(args).await,
        Commands::Identity(args) => commands::identity::run(args).await,
    }
}

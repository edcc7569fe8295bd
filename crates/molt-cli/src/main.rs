// crates/molt-cli/src/main.rs
//
// `molt` — migrate legacy upload records into a capability-secured
// storage space.
//
// Reads newline-delimited JSON upload records on stdin, registers every
// CAR shard with the destination space (transferring bytes only when the
// destination asks), registers each logical upload, and prints one
// provenance entry per completed action on stdout. Diagnostics go to
// stderr; stdout is the durable record of the run.

mod profile;
mod report;

use std::io::IsTerminal;

use clap::Parser;
use tokio::io::BufReader;

use molt_client::{BridgeClient, HttpTransport};
use molt_core::SpaceDid;
use molt_migrate::{plan, Migrator, RecordReader};

/// Migrate legacy upload records into a capability-secured storage space.
#[derive(Parser, Debug)]
#[command(
    name = "molt",
    version = "0.1.0",
    about = "Migrate legacy upload records into a capability-secured storage space"
)]
struct Args {
    /// DID of the destination space to migrate into (did:key method).
    #[arg(long)]
    space: String,

    /// Capability bridge endpoint of the destination service.
    #[arg(long, default_value = "https://up.web3.storage/bridge")]
    api: String,

    /// Gateway base URL the legacy service serves CAR bytes from.
    #[arg(long, default_value = plan::DEFAULT_GATEWAY)]
    gateway: String,

    /// Profile directory holding agent.toml (DID + signing key).
    /// Defaults to ~/.molt; the MOLT_PROFILE environment variable
    /// overrides the default.
    #[arg(long)]
    profile: Option<String>,
}

#[tokio::main]
async fn main() {
    // Diagnostics on stderr; stdout is reserved for provenance entries.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("migration aborted: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let space = SpaceDid::parse(&args.space)?;

    if std::io::stdin().is_terminal() {
        return Err(
            "pipe newline-delimited JSON upload records to stdin (e.g. from the legacy `list --json`)"
                .into(),
        );
    }

    let identity = profile::load_agent(args.profile.as_deref())?;
    tracing::info!("acting as {}", identity.did);
    tracing::info!("migrating into space {}", space);

    let store = BridgeClient::new(&args.api, identity);
    let issuer = store.issuer().to_string();
    let transport = HttpTransport::new();

    let stdin = BufReader::new(tokio::io::stdin());
    let mut records = RecordReader::new(stdin);

    let mut migrator = Migrator::new(
        &store,
        &transport,
        issuer,
        space,
        args.gateway,
        std::io::stdout(),
    );
    let migration = migrator.run(&mut records).await?;

    report::print_summary(&migration);
    Ok(())
}

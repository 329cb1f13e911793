//! Riskpanel CLI binary.

use anyhow::Result;
use riskpanel::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the riskpanel CLI.
///
/// Uses tokio's current_thread runtime: every command is a short sequence of
/// requests issued one after another.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Controlled via RUST_LOG, e.g. RUST_LOG=riskpanel=debug
    // Logs go to stderr so `--json` output on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("riskpanel=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting riskpanel CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Riskpanel CLI completed successfully");
    Ok(())
}

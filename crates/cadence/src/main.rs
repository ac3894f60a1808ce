//! Cadence CLI binary.

use anyhow::Result;
use cadence::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // RUST_LOG wins over --verbose, e.g. RUST_LOG=cadence=trace
    let default_filter = if cli.verbose {
        "cadence=debug"
    } else {
        "cadence=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("Starting cadence CLI");
    cli.execute()?;
    tracing::debug!("Cadence CLI completed successfully");
    Ok(())
}

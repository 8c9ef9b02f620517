//! dash — a live synthetic-reading dashboard for the terminal.
//!
//! Run with:  `RUST_LOG=info dash 2>dash.log`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the terminal UI.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("dash v{} starting", env!("CARGO_PKG_VERSION"));

    dash_terminal::run().map_err(Into::into)
}

//! Gabble entry point.
//!
//! Binary name: `gabble`
//!
//! Parses CLI arguments, initializes tracing, then either runs the chat
//! server or joins one as a watching client.

mod cli;
mod client;
mod http;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,gabble=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { addr } => cli::serve::run(&addr).await,
        Commands::Watch {
            name,
            server,
            interval,
        } => cli::watch::run(&name, &server, interval).await,
    }
}

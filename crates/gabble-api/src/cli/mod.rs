//! Command-line interface definitions.

use clap::{Parser, Subcommand};

pub mod serve;
pub mod watch;

/// Gabble: a poll-based group chat server and client.
#[derive(Debug, Parser)]
#[command(name = "gabble", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the chat server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8100", env = "GABBLE_ADDR")]
        addr: String,
    },

    /// Join a server and watch the chat feed; type to post, ctrl-c to leave
    Watch {
        /// Display name to join as
        #[arg(long)]
        name: String,

        /// Server base URL
        #[arg(long, default_value = "http://127.0.0.1:8100", env = "GABBLE_SERVER")]
        server: String,

        /// Seconds between polls
        #[arg(long, default_value_t = 2)]
        interval: u64,
    },
}

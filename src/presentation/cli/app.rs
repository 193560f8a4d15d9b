use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// lookout — terminal uptime dashboard
///
/// Periodically checks the liveness of registered network endpoints
/// through pluggable protocol probes and shows the results in a TUI.
#[derive(Parser, Debug)]
#[command(name = "lookout")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Subcommand to execute (defaults to the dashboard)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to custom config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive dashboard
    #[command(alias = "w")]
    Watch {
        /// Seconds between check cycles (default: config)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Run one check cycle and print the results
    #[command(alias = "c")]
    Check {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Register a new target
    #[command(alias = "a")]
    Add {
        /// Endpoint to monitor (domain, IP, or host:port)
        address: String,

        /// Probe to check it with
        probe: String,
    },

    /// List registered targets and their last known status
    #[command(alias = "l")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available probes
    #[command(alias = "p")]
    Probes,
}

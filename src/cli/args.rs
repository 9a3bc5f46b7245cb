//! CLI argument definitions using clap
//!
//! Commands:
//! - vigil init --config <path>
//! - vigil exec --config <path> --caller <account> --block <height>
//! - vigil run --config <path>
//! - vigil show --config <path> --switch-id <id>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// vigil - a strict, deterministic dead man's switch ledger
#[derive(Parser, Debug)]
#[command(name = "vigil")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Activate a fresh ledger snapshot
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./vigil.json")]
        config: PathBuf,
    },

    /// Execute one operation read as JSON from stdin
    Exec {
        /// Path to configuration file
        #[arg(long, default_value = "./vigil.json")]
        config: PathBuf,

        /// Caller account: 64 hex characters, or a name to derive one from
        #[arg(long)]
        caller: String,

        /// Block height the operation executes at
        #[arg(long)]
        block: u64,
    },

    /// Serve operations line-by-line from stdin until EOF; each request
    /// object must carry its own "caller" and "block" fields
    Run {
        /// Path to configuration file
        #[arg(long, default_value = "./vigil.json")]
        config: PathBuf,
    },

    /// Print one switch record
    Show {
        /// Path to configuration file
        #[arg(long, default_value = "./vigil.json")]
        config: PathBuf,

        /// Switch identifier
        #[arg(long)]
        switch_id: u64,
    },
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

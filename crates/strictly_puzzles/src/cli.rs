//! Command-line interface for strictly_puzzles.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Puzzles - Rule-enforcing puzzle simulators with an MCP interface
#[derive(Parser, Debug)]
#[command(name = "strictly_puzzles")]
#[command(about = "Puzzle simulators for checking LLM move sequences", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file. Defaults apply if it does not exist.
    #[arg(short, long, global = true, default_value = "strictly_puzzles.toml")]
    pub config: PathBuf,

    /// Override the idle session TTL in seconds
    #[arg(long, global = true)]
    pub ttl_secs: Option<u64>,

    /// Override the background sweep interval in seconds
    #[arg(long, global = true)]
    pub sweep_interval_secs: Option<u64>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the MCP simulator server (stdio mode)
    Server,

    /// Run the MCP simulator server over HTTP
    Http {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

//! Command-line interface for teamsheet.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Teamsheet - training sessions and attendance for a squad
#[derive(Debug, Parser)]
#[command(name = "teamsheet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default search paths
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Write a default config file with a fresh signing secret
    Init,

    /// Create an account from the shell
    AddUser {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// `manager` or `player`
        #[arg(long, default_value = "manager")]
        role: String,
    },

    /// Validate the effective configuration and print it
    CheckConfig,
}

//! Command-line interface

pub mod serve;

use clap::{Parser, Subcommand};

/// mailhub - domain identity and key service for outbound mail
#[derive(Parser)]
#[command(name = "mailhub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the admin and mail HTTP API
    Serve,
}

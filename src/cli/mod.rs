//! CLI module for the Users API

pub mod serve;

use clap::{Parser, Subcommand};

/// Users API - create, search, update and delete user records
#[derive(Parser)]
#[command(name = "users-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
}

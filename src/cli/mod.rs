//! Command-line interface for the admin console.

mod commands;

use clap::{Parser, Subcommand};

pub use commands::execute;

/// RADIUS account administration console
#[derive(Parser)]
#[command(name = "radman")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web console
    #[command(alias = "daemon", alias = "-d")]
    Serve,

    /// Create a default config file if none exists
    Init,

    /// Create an account from the command line
    #[command(alias = "add")]
    AddUser {
        /// Account email address
        username: String,
        /// Cleartext password
        password: String,
        /// Group to assign (defaults to the configured group)
        #[arg(long)]
        group: Option<String>,
    },

    /// Delete an account and all its entries
    #[command(alias = "del", alias = "rm")]
    DelUser {
        /// Account email address
        username: String,
        /// Required acknowledgement that the delete is intended
        #[arg(long)]
        yes: bool,
    },

    /// List accounts and their groups
    #[command(alias = "ls")]
    ListUsers {
        /// Page number, omit for the full listing
        #[arg(long)]
        page: Option<u64>,
    },
}

//! CLI argument definitions using clap
//!
//! Commands:
//! - coursedb add --data-dir <dir> --id <id> --archive <path>
//! - coursedb remove --data-dir <dir> --id <id>
//! - coursedb list --data-dir <dir>
//! - coursedb query --data-dir <dir> [--file <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// coursedb - an in-memory query engine for academic course section datasets
#[derive(Parser, Debug)]
#[command(name = "coursedb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a dataset from a base64-encoded tar archive of course files
    Add {
        /// Data directory holding the catalog
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        /// Dataset id (no underscores)
        #[arg(long)]
        id: String,

        /// Path to a file holding the base64 archive content
        #[arg(long)]
        archive: PathBuf,
    },

    /// Remove a stored dataset
    Remove {
        /// Data directory holding the catalog
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        /// Dataset id to remove
        #[arg(long)]
        id: String,
    },

    /// List stored datasets
    List {
        /// Data directory holding the catalog
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,
    },

    /// Run a query document and print the result rows
    Query {
        /// Data directory holding the catalog
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        /// Query JSON file; stdin when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

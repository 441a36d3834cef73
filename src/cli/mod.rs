//! CLI for coursedb
//!
//! A thin command surface over the dataset catalog and the query executor.

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::run;
pub use errors::{CliError, CliResult};

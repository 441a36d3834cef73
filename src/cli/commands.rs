//! CLI command implementations
//!
//! Each command opens the catalog at the given data directory, performs one
//! operation and prints its result to stdout as JSON. Event logging goes to
//! stderr.

use std::fs;
use std::io::Read;

use serde_json::Value;

use crate::dataset::DatasetCatalog;
use crate::observability::log_event;
use crate::query::QueryExecutor;

use super::args::{Cli, Command};
use super::errors::CliResult;

/// Parses arguments and dispatches the selected command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match cli.command {
        Command::Add {
            data_dir,
            id,
            archive,
        } => {
            let mut catalog = DatasetCatalog::open(data_dir)?;
            let content = fs::read_to_string(archive)?;
            let ids = catalog.add(&id, &content)?;
            println!("{}", serde_json::to_string_pretty(&ids)?);
            Ok(())
        }

        Command::Remove { data_dir, id } => {
            let mut catalog = DatasetCatalog::open(data_dir)?;
            let removed = catalog.remove(&id)?;
            println!("{}", removed);
            Ok(())
        }

        Command::List { data_dir } => {
            let catalog = DatasetCatalog::open(data_dir)?;
            println!("{}", serde_json::to_string_pretty(&catalog.list())?);
            Ok(())
        }

        Command::Query { data_dir, file } => {
            let catalog = DatasetCatalog::open(data_dir)?;
            let raw = match file {
                Some(path) => fs::read_to_string(path)?,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            let document: Value = serde_json::from_str(&raw)?;

            let executor = QueryExecutor::new(&catalog);
            match executor.execute(&document) {
                Ok(rows) => {
                    log_event("query_executed", &[("rows", &rows.len().to_string())]);
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                    Ok(())
                }
                Err(error) => {
                    log_event("query_failed", &[("error", &error.to_string())]);
                    Err(error.into())
                }
            }
        }
    }
}

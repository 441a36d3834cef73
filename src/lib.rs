//! coursedb - an in-memory query engine for academic course section datasets
//!
//! Datasets are added from archives, held as immutable section tables and
//! queried with a JSON-shaped filter language.

pub mod cli;
pub mod dataset;
pub mod observability;
pub mod query;

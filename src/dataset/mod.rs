//! Dataset subsystem for coursedb
//!
//! The collaborators around the query core: the section record type,
//! archive ingestion, and the persisted catalog of loaded datasets.

mod catalog;
mod errors;
mod ingest;
mod section;

pub use catalog::{Dataset, DatasetCatalog, DatasetInfo, DatasetKind};
pub use errors::{DatasetError, DatasetResult};
pub use ingest::ingest_archive;
pub use section::{Field, NumericField, Section, StringField};

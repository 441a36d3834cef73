//! Dataset catalog
//!
//! Tracks which datasets exist, owns their section tables and persists the
//! whole catalog as one JSON file under the data directory. Every load of
//! the persisted file validates a CRC32 checksum; every mutation rewrites
//! the file and its checksum together. Mutations persist immediately, so
//! the catalog never holds unpersisted state.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::observability::log_event;
use crate::query::SectionSource;

use super::errors::{DatasetError, DatasetResult};
use super::ingest::ingest_archive;
use super::section::Section;

/// Catalog file name under the data directory
const CATALOG_FILE: &str = "courses.json";
/// Sidecar checksum file name
const CHECKSUM_FILE: &str = "courses.json.crc32";

/// The kind of records a dataset holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetKind {
    /// Course sections
    Sections,
}

/// A stored dataset: id, kind and its immutable section table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub kind: DatasetKind,
    pub added_at: DateTime<Utc>,
    pub sections: Vec<Section>,
}

/// Summary row for the list surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetInfo {
    pub id: String,
    pub kind: DatasetKind,
    pub num_rows: usize,
}

/// On-disk catalog layout
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    courses: Vec<Dataset>,
}

/// Borrowed view of the same layout for writing
#[derive(Serialize)]
struct CatalogFileOut<'a> {
    courses: &'a [Dataset],
}

/// In-memory catalog bound to a data directory
#[derive(Debug)]
pub struct DatasetCatalog {
    data_dir: PathBuf,
    datasets: Vec<Dataset>,
}

impl DatasetCatalog {
    /// Opens the catalog at `data_dir`, creating the directory if needed
    /// and loading any persisted datasets.
    pub fn open(data_dir: impl Into<PathBuf>) -> DatasetResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        let mut catalog = Self {
            data_dir,
            datasets: Vec::new(),
        };
        catalog.load()?;
        Ok(catalog)
    }

    /// Adds a dataset from a base64 tar archive and persists the catalog.
    /// Returns the ids of all stored datasets.
    pub fn add(&mut self, id: &str, content_b64: &str) -> DatasetResult<Vec<String>> {
        validate_id(id)?;
        if self.datasets.iter().any(|dataset| dataset.id == id) {
            return Err(DatasetError::AlreadyExists(id.to_string()));
        }

        let sections = ingest_archive(content_b64)?;
        let num_rows = sections.len();
        self.datasets.push(Dataset {
            id: id.to_string(),
            kind: DatasetKind::Sections,
            added_at: Utc::now(),
            sections,
        });
        self.save()?;

        log_event(
            "dataset_added",
            &[("dataset", id), ("rows", &num_rows.to_string())],
        );
        Ok(self.ids())
    }

    /// Removes a dataset and persists the catalog. Returns the removed id.
    pub fn remove(&mut self, id: &str) -> DatasetResult<String> {
        validate_id(id)?;
        let position = self
            .datasets
            .iter()
            .position(|dataset| dataset.id == id)
            .ok_or_else(|| DatasetError::NotFound(id.to_string()))?;
        self.datasets.remove(position);
        self.save()?;

        log_event("dataset_removed", &[("dataset", id)]);
        Ok(id.to_string())
    }

    /// Lists stored datasets in insertion order.
    pub fn list(&self) -> Vec<DatasetInfo> {
        self.datasets
            .iter()
            .map(|dataset| DatasetInfo {
                id: dataset.id.clone(),
                kind: dataset.kind,
                num_rows: dataset.sections.len(),
            })
            .collect()
    }

    /// Returns the stored dataset ids in insertion order.
    pub fn ids(&self) -> Vec<String> {
        self.datasets.iter().map(|dataset| dataset.id.clone()).collect()
    }

    fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(CATALOG_FILE)
    }

    fn checksum_path(&self) -> PathBuf {
        self.data_dir.join(CHECKSUM_FILE)
    }

    /// Loads the persisted catalog, validating its checksum when present.
    /// A missing catalog file is an empty catalog.
    fn load(&mut self) -> DatasetResult<()> {
        let path = self.catalog_path();
        if !path.exists() {
            return Ok(());
        }
        let bytes = fs::read(&path)?;

        if let Ok(stored) = fs::read_to_string(self.checksum_path()) {
            let stored: u32 = stored.trim().parse().map_err(|_| {
                DatasetError::CatalogCorrupted("unreadable checksum file".to_string())
            })?;
            let computed = checksum(&bytes);
            if stored != computed {
                return Err(DatasetError::CatalogCorrupted(format!(
                    "checksum mismatch: stored {}, computed {}",
                    stored, computed
                )));
            }
        }

        let file: CatalogFile = serde_json::from_slice(&bytes)?;
        self.datasets = file.courses;
        Ok(())
    }

    /// Rewrites the catalog file and its checksum. The catalog is written
    /// to a temporary name first and renamed into place.
    fn save(&self) -> DatasetResult<()> {
        let bytes = serde_json::to_vec_pretty(&CatalogFileOut {
            courses: &self.datasets,
        })?;

        let tmp = self.data_dir.join(format!("{}.tmp", CATALOG_FILE));
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, self.catalog_path())?;
        fs::write(self.checksum_path(), checksum(&bytes).to_string())?;
        Ok(())
    }
}

impl SectionSource for DatasetCatalog {
    fn sections(&self, dataset_id: &str) -> Option<&[Section]> {
        self.datasets
            .iter()
            .find(|dataset| dataset.id == dataset_id)
            .map(|dataset| dataset.sections.as_slice())
    }
}

/// A dataset id must be non-empty, not whitespace-only, and contain no
/// underscore (the underscore separates id from field in query keys).
fn validate_id(id: &str) -> DatasetResult<()> {
    if id.trim().is_empty() || id.contains('_') {
        return Err(DatasetError::InvalidId(id.to_string()));
    }
    Ok(())
}

/// CRC32 over the exact bytes of the persisted catalog.
fn checksum(bytes: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    hasher.finalize()
}

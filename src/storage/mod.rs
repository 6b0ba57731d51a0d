//! Whole-dataset persistence for a household.

mod records;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};

use crate::domain::DomainError;
use crate::household::HouseholdError;

pub use records::{
    ChildRecord, Dataset, EventRecord, ExecutionRecord, GuardianRecord, RoutineItemRecord,
    RoutineRecord,
};

/// Storage abstraction so the CLI and tests can swap the backing medium.
pub trait HouseholdStore: Send + Sync {
    fn load(&self) -> Result<Dataset, StorageError>;
    fn save(&self, dataset: &Dataset) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unable to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed data file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored data rejected: {0}")]
    Restore(#[from] HouseholdError),
}

impl From<DomainError> for StorageError {
    fn from(err: DomainError) -> Self {
        Self::Restore(HouseholdError::Domain(err))
    }
}

/// Pretty-printed JSON document on disk. A missing file reads as an empty dataset.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl HouseholdStore for JsonFileStore {
    fn load(&self) -> Result<Dataset, StorageError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "data file absent; starting empty");
            return Ok(Dataset::default());
        }

        let raw = fs::read_to_string(&self.path).map_err(|err| self.io_error(err))?;
        if raw.trim().is_empty() {
            return Ok(Dataset::default());
        }
        let dataset: Dataset = serde_json::from_str(&raw)?;
        debug!(
            path = %self.path.display(),
            guardians = dataset.guardians.len(),
            children = dataset.children.len(),
            "loaded data file"
        );
        Ok(dataset)
    }

    /// Write to a sibling temp file and rename it over the target.
    fn save(&self, dataset: &Dataset) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let body = serde_json::to_string_pretty(dataset)?;
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        fs::write(&staging, body).map_err(|err| self.io_error(err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))?;

        info!(
            path = %self.path.display(),
            guardians = dataset.guardians.len(),
            children = dataset.children.len(),
            routines = dataset.routines.len(),
            events = dataset.events.len(),
            "saved data file"
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    dataset: Mutex<Dataset>,
}

impl InMemoryStore {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Mutex::new(dataset),
        }
    }
}

impl HouseholdStore for InMemoryStore {
    fn load(&self) -> Result<Dataset, StorageError> {
        Ok(self.dataset.lock().expect("dataset mutex poisoned").clone())
    }

    fn save(&self, dataset: &Dataset) -> Result<(), StorageError> {
        *self.dataset.lock().expect("dataset mutex poisoned") = dataset.clone();
        Ok(())
    }
}

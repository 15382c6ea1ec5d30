use std::path::Path;
use std::sync::Arc;

use super::filter::FilterDimension;
use super::loader;
use super::model::{Dataset, Value};
use crate::error::{LoadError, MissingColumnError};
use crate::session::Session;

/// Owner of the loaded dataset. Built once by the process bootstrap; every
/// session receives a clone of the same `Arc<Dataset>`.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    dataset: Arc<Dataset>,
}

impl DatasetStore {
    /// Load the dataset at `path`. Failure here is fatal for the caller.
    pub fn load(path: &Path, name: &str) -> Result<Self, LoadError> {
        let dataset = loader::load_file(path, name)?;
        log::info!(
            "Loaded '{}' from {}: {} rows, columns {:?}",
            dataset.name(),
            path.display(),
            dataset.len(),
            dataset.columns().iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );
        Ok(Self::from_dataset(dataset))
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }

    pub fn dataset(&self) -> Arc<Dataset> {
        Arc::clone(&self.dataset)
    }

    pub fn distinct_values(&self, dimension: FilterDimension) -> Result<&[Value], MissingColumnError> {
        self.dataset.distinct_values(dimension)
    }

    /// Start a new session over the shared dataset.
    pub fn session(&self) -> crate::error::Result<Session> {
        Session::new(self.dataset())
    }
}

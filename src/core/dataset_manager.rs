use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use bedflow_core::storage::{dataset_warnings, DatasetReader};
use bedflow_domain::RecordStore;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::errors::{AppError, Result};

/// Metadata describing the outcome of a load operation.
#[derive(Debug, Clone)]
pub struct LoadMetadata {
    pub path: PathBuf,
    pub rows: usize,
    pub inpatient_rows: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub warnings: Vec<String>,
}

/// Owns the published record store and swaps it only after a complete, successful read.
pub struct DatasetManager {
    current: Option<Arc<RecordStore>>,
    current_path: Option<PathBuf>,
    warnings: Vec<String>,
    reader: Box<dyn DatasetReader>,
}

impl DatasetManager {
    pub fn new(reader: Box<dyn DatasetReader>) -> Self {
        Self {
            current: None,
            current_path: None,
            warnings: Vec::new(),
            reader,
        }
    }

    pub fn set_reader(&mut self, reader: Box<dyn DatasetReader>) {
        self.reader = reader;
    }

    pub fn load(&mut self, path: &Path) -> Result<LoadMetadata> {
        let store = self.reader.read_path(path).map_err(|err| {
            warn!(path = %path.display(), error = %err, "dataset load failed; keeping previous store");
            AppError::from(err)
        })?;

        let warnings = dataset_warnings(&store);
        let metadata = LoadMetadata {
            path: path.to_path_buf(),
            rows: store.len(),
            inpatient_rows: store.inpatient().count(),
            date_range: store.date_range(),
            warnings: warnings.clone(),
        };

        self.current = Some(Arc::new(store));
        self.current_path = Some(path.to_path_buf());
        self.warnings = warnings;
        info!(
            path = %path.display(),
            rows = metadata.rows,
            inpatient_rows = metadata.inpatient_rows,
            "dataset published"
        );
        Ok(metadata)
    }

    /// Snapshot of the published store; later loads never mutate it.
    pub fn current(&self) -> Result<Arc<RecordStore>> {
        self.current.clone().ok_or(AppError::DatasetNotLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

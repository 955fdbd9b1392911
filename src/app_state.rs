//! Implements the struct that holds the state of the web server.

use std::{
    path::PathBuf,
    sync::{Arc, RwLock, RwLockReadGuard},
};

use crate::{Error, aggregation::EngineOptions, dataset::Dataset};

/// The state shared by all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The in-memory sales dataset.
    pub dataset: Arc<RwLock<Dataset>>,

    /// Return convention and count policy for the aggregation engine.
    pub engine_options: EngineOptions,

    /// Where the sales CSV lives on disk, for explicit refreshes.
    pub csv_path: PathBuf,
}

impl AppState {
    /// Creates the shared state around an already-loaded dataset.
    pub fn new(dataset: Dataset, engine_options: EngineOptions, csv_path: PathBuf) -> Self {
        Self {
            dataset: Arc::new(RwLock::new(dataset)),
            engine_options,
            csv_path,
        }
    }

    /// Acquires a read lock on the dataset.
    ///
    /// # Errors
    /// Returns [Error::DatasetLockError] if the lock is poisoned.
    pub fn read_dataset(&self) -> Result<RwLockReadGuard<'_, Dataset>, Error> {
        self.dataset.read().map_err(|error| {
            tracing::error!("could not acquire dataset lock: {error}");
            Error::DatasetLockError
        })
    }
}

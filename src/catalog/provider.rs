use std::path::PathBuf;

use crate::core::disease::Association;

use super::store::{CatalogError, DiseaseCatalog};

/// Source of disease/symptom association rows for a matching pass
pub trait CatalogProvider {
    /// All associations currently on record
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying data cannot be read.
    fn associations(&self) -> Result<Vec<Association>, CatalogError>;
}

impl CatalogProvider for DiseaseCatalog {
    fn associations(&self) -> Result<Vec<Association>, CatalogError> {
        Ok(DiseaseCatalog::associations(self))
    }
}

impl CatalogProvider for [Association] {
    fn associations(&self) -> Result<Vec<Association>, CatalogError> {
        Ok(self.to_vec())
    }
}

impl CatalogProvider for Vec<Association> {
    fn associations(&self) -> Result<Vec<Association>, CatalogError> {
        Ok(self.clone())
    }
}

/// Catalog JSON file re-read on every call, so edits are picked up without a restart
#[derive(Debug, Clone)]
pub struct JsonCatalogFile {
    path: PathBuf,
}

impl JsonCatalogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogProvider for JsonCatalogFile {
    fn associations(&self) -> Result<Vec<Association>, CatalogError> {
        let catalog = DiseaseCatalog::load_from_file(&self.path)?;
        Ok(catalog.associations())
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::FactureError;

/// On-disk layout under one data root.
///
/// ```text
/// <root>/
/// ├── config.json
/// ├── logo.png | logo.jpg
/// ├── data/vtc_factures.db
/// ├── factures/facture_<number>.pdf
/// └── export_factures.csv
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.json")
    }

    /// Candidate logo locations, one per supported image format.
    pub fn logo_files(&self) -> [PathBuf; 2] {
        [self.root.join("logo.png"), self.root.join("logo.jpg")]
    }

    pub fn database(&self) -> PathBuf {
        self.root.join("data").join("vtc_factures.db")
    }

    pub fn invoices_dir(&self) -> PathBuf {
        self.root.join("factures")
    }

    pub fn default_export(&self) -> PathBuf {
        self.root.join("export_factures.csv")
    }

    /// Create the invoices directory if needed. Idempotent.
    pub fn ensure_invoices_dir(&self) -> Result<PathBuf, FactureError> {
        let dir = self.invoices_dir();
        fs::create_dir_all(&dir).map_err(|e| {
            FactureError::Render(format!("cannot create {}: {e}", dir.display()))
        })?;
        Ok(dir)
    }

    /// Create the database directory if needed. Idempotent.
    pub fn ensure_data_dir(&self) -> Result<PathBuf, FactureError> {
        let db = self.database();
        if let Some(dir) = db.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                FactureError::Persistence(format!("cannot create {}: {e}", dir.display()))
            })?;
        }
        Ok(db)
    }
}

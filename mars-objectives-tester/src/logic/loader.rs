use std::fs;
use std::path::{Path, PathBuf};

use mars_objectives::{Catalog, CatalogError, DataLoader, SynergyTable, SynergyTableError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog")]
    Catalog(#[from] CatalogError),
    #[error("invalid synergy table")]
    Synergy(#[from] SynergyTableError),
}

/// Reads catalog and synergy JSON from disk, falling back to the built-in data.
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    pub catalog: Option<PathBuf>,
    pub synergies: Option<PathBuf>,
}

impl FileLoader {
    pub const fn new(catalog: Option<PathBuf>, synergies: Option<PathBuf>) -> Self {
        Self { catalog, synergies }
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl DataLoader for FileLoader {
    type Error = LoadError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        match &self.catalog {
            Some(path) => Ok(Catalog::from_json(&read(path)?)?),
            None => Ok(Catalog::standard()),
        }
    }

    fn load_synergies(&self) -> Result<SynergyTable, Self::Error> {
        match &self.synergies {
            Some(path) => Ok(SynergyTable::from_json(&read(path)?)?),
            None => Ok(SynergyTable::standard()),
        }
    }
}

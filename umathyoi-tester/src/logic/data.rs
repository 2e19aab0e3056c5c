use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use umathyoi_game::{CardCatalog, DataLoader, ScenarioCatalog};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse bundled data")]
    Bundled(#[source] serde_json::Error),
}

/// Loads catalogs from JSON files, falling back to the bundled data for any
/// path that is not given.
#[derive(Debug, Clone, Default)]
pub struct FileDataLoader {
    pub cards: Option<PathBuf>,
    pub scenarios: Option<PathBuf>,
}

impl FileDataLoader {
    #[must_use]
    pub const fn new(cards: Option<PathBuf>, scenarios: Option<PathBuf>) -> Self {
        Self { cards, scenarios }
    }
}

fn read_json<T>(path: &Path, parse: impl FnOnce(&str) -> serde_json::Result<T>) -> Result<T, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl DataLoader for FileDataLoader {
    type Error = LoadError;

    fn load_cards(&self) -> Result<CardCatalog, Self::Error> {
        match &self.cards {
            Some(path) => read_json(path, CardCatalog::from_json),
            None => CardCatalog::load_from_static().map_err(LoadError::Bundled),
        }
    }

    fn load_scenarios(&self) -> Result<ScenarioCatalog, Self::Error> {
        match &self.scenarios {
            Some(path) => read_json(path, ScenarioCatalog::from_json),
            None => ScenarioCatalog::load_from_static().map_err(LoadError::Bundled),
        }
    }
}

// Tue Jan 13 2026 - Alex

use crate::gameval::Category;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read gamevals from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse gamevals from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum GamevalError {
    #[error("Missing {category} gameval: {name}")]
    MissingName { category: Category, name: String },
    #[error("Unknown gameval category: {0}")]
    UnknownCategory(String),
    #[error("Unknown id field key: {0}")]
    UnknownFieldKey(String),
    #[error("Codec error: {0}")]
    Codec(String),
    #[error("Watch error: {0}")]
    Watch(String),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GamevalError>;

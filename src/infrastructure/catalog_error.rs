//! Catalog I/O error types
//!
//! Errors raised while reading scraper dumps, writing outputs and talking to
//! the catalog store. The normalization and dedup stages never produce these.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::config::ConfigError;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported dump shape in {path}: {reason}")]
    InvalidDump { path: PathBuf, reason: String },

    #[error("Catalog store error: {message}")]
    Store { message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CatalogError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn invalid_dump(path: &Path, reason: &str) -> Self {
        Self::InvalidDump {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

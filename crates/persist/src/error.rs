use std::path::PathBuf;

use replay_tetris_core::RngStateError;
use thiserror::Error;

/// Byte-level storage failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{path} does not exist")]
    NotFound { path: String },
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

/// Why a snapshot or replay file could not be loaded.
///
/// Any of these fails the whole load; there is no partial restore.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    RandomState(#[from] RngStateError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LoadError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        LoadError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Why a snapshot or replay could not be written
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

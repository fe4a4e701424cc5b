//! On-disk persistence of the monitored thread ids.
//!
//! The file holds a single JSON array of strings (`["111","222"]`). It is read
//! once at startup and rewritten wholesale on graceful shutdown.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::fs::{ExistsFile, ReadFile, SystemFs, WriteFile};

/// Default location of the state file, relative to the working directory.
pub const DEFAULT_STATE_FILE: &str = "state.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read state file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write state file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("State file {} is not a JSON array: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct StateStore<F = SystemFs> {
    fs: F,
    path: PathBuf,
}

impl StateStore<SystemFs> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_fs(SystemFs, path)
    }
}

impl<F> StateStore<F>
where
    F: ReadFile + WriteFile + ExistsFile,
{
    pub fn with_fs(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted ids. A missing file means nothing is tracked yet.
    ///
    /// Non-string array elements (e.g. bare numbers) are kept in their JSON
    /// text form.
    pub fn load(&self) -> Result<BTreeSet<String>, StoreError> {
        if !self.fs.exists(&self.path) {
            return Ok(BTreeSet::new());
        }

        let content = self
            .fs
            .read_to_string(&self.path)
            .map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })?;

        let values: Vec<Value> =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        Ok(values
            .into_iter()
            .map(|value| match value {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect())
    }

    /// Overwrite the file with `ids`, in sorted order.
    pub fn save(&self, ids: &BTreeSet<String>) -> Result<(), StoreError> {
        let content = serde_json::to_string(ids)?;

        self.fs
            .write(&self.path, &content)
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

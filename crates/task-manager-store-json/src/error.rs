//! Error types for task-manager file store operations.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur during `JsonFileStore` operations.
#[derive(Error, Debug)]
pub enum JsonStoreError {
    /// Reading, writing, or replacing the task file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The task file does not contain a valid JSON array of tasks.
    #[error("Failed to parse task file {}: {source}", .path.display())]
    Deserialize {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to encode the task collection.
    #[error("Failed to serialize tasks: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Another holder of the file lock panicked.
    #[error("Task file lock poisoned")]
    Lock,
}

impl JsonStoreError {
    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, JsonStoreError>;

//! Error types for todo operations

use thiserror::Error;
use todomvc_core::StorageError;

/// Errors that can occur while mutating a todo collection.
///
/// Unknown ids are not errors: updating or removing an item that is not in
/// the store is a silent no-op.
#[derive(Error, Debug)]
pub enum TodoError {
    /// Writing the collection to storage failed
    ///
    /// The mutation was not applied and no notification was sent.
    #[error("Persistence failed: {0}")]
    Storage(#[from] StorageError),

    /// The collection could not be encoded
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store owner reported a failure over the todo channel
    #[error("'{command}' failed: {reason}")]
    Reported {
        /// Name of the failed command
        command: &'static str,
        /// Display form of the underlying error
        reason: String,
    },

    /// No store owner is listening on the todo channel
    #[error("No store is attached to channel '{0}'")]
    Detached(String),
}

/// Result type for todo operations.
pub type Result<T> = std::result::Result<T, TodoError>;

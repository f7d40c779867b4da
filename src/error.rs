//! Error types for the document store.

use thiserror::Error;

use crate::validation::NameError;

/// Errors returned by every store operation.
///
/// Backend failures are carried untranslated in [`StoreError::Io`]; everything
/// else is raised by the domain layer before (or instead of) touching storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A resource name or entity id was rejected by the name validator.
    #[error("Invalid identifier: {name}")]
    InvalidIdentifier {
        name: String,
        #[source]
        reason: NameError,
    },

    /// The requested file is not present in the directory.
    #[error("File does not exist: {0}")]
    FileNotFound(String),

    /// The requested child directory is not present.
    #[error("Directory does not exist: {0}")]
    DirectoryNotFound(String),

    /// The backend refused to remove a directory that still has entries.
    #[error("Directory not empty: {0}")]
    DirectoryNotEmpty(String),

    /// A save was attempted with a null or empty document.
    #[error("Cannot save empty content")]
    EmptyContent,

    /// The entity still owns at least one resource.
    #[error("Entity not empty")]
    EntityNotEmpty,

    /// The resource still holds at least one entity.
    #[error("Resource not empty")]
    ResourceNotEmpty,

    /// The root entity is bound to the store's own directory and has no parent
    /// to be removed from.
    #[error("The root entity cannot be deleted")]
    RootNotDeletable,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

//! Storage backends.
//!
//! The domain layer only ever talks to a [`DirectoryProvider`]: a handle bound
//! to one directory of the tree, offering file and sub-directory primitives.
//!
//! # Main Components
//!
//! - [`DirectoryProvider`] - The backend contract
//! - [`MemoryDirectory`] - In-process tree, used by tests and the default config
//! - [`FsDirectory`] - Local filesystem via `tokio::fs`
//! - [`remove_tree`] - Depth-first subtree removal over the contract alone
//!
//! # Testing
//!
//! See [`mock`] for a recording wrapper that lets tests assert which backend
//! calls an operation made.

pub mod fs;
pub mod memory;
pub mod mock;
pub mod recursive_delete;

pub use fs::FsDirectory;
pub use memory::MemoryDirectory;
pub use recursive_delete::remove_tree;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::validation::{NameError, NameValidator, NoSpecialCharsValidator};

/// File and directory primitives rooted at one tree node's physical location.
///
/// # Contract
///
/// - `read_file` fails with [`FileNotFound`](crate::StoreError::FileNotFound) when absent.
/// - `write_file` creates or fully replaces the file.
/// - `delete_file` is a no-op when the file is absent.
/// - `get_directory_provider` fails with
///   [`DirectoryNotFound`](crate::StoreError::DirectoryNotFound) when absent.
/// - `create_directory` is create-if-absent and never clears an existing directory.
/// - `delete_directory` removes a named child, or this directory when `name`
///   is `None`, and fails if the target still has entries.
#[async_trait]
pub trait DirectoryProvider: Send + Sync {
    /// Segment name this handle is bound to (empty for a root).
    fn directory_name(&self) -> &str;

    async fn read_file(&self, name: &str) -> Result<String>;

    async fn write_file(&self, name: &str, content: &str) -> Result<()>;

    async fn delete_file(&self, name: &str) -> Result<()>;

    async fn list_files(&self) -> Result<Vec<String>>;

    async fn list_directories(&self) -> Result<Vec<String>>;

    async fn get_directory_provider(&self, name: &str) -> Result<Arc<dyn DirectoryProvider>>;

    async fn create_directory(&self, name: &str) -> Result<()>;

    async fn delete_directory(&self, name: Option<&str>) -> Result<()>;

    /// Backend-level segment check.
    fn validate(&self, name: &str) -> Result<(), NameError> {
        NoSpecialCharsValidator.validate(name)
    }
}

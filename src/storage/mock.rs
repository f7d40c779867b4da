//! # Recording Backend
//!
//! Utilities for asserting which backend calls a domain operation made.
//!
//! Wrap any [`DirectoryProvider`] in a [`RecordingDirectory`]; every call on it
//! (and on every sub-handle it hands out) is appended to one shared log.
//!
//! ```ignore
//! let recorder = RecordingDirectory::new(MemoryDirectory::new());
//! let log = recorder.log();
//! let root = open_root(Arc::new(recorder), Arc::new(JsonSerializer::new()));
//! assert!(root.create_resource("a/b").await.is_err());
//! assert!(log.calls().is_empty());
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::DirectoryProvider;
use crate::error::Result;

/// One backend call, tagged with the directory it was made on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ReadFile { directory: String, name: String },
    WriteFile { directory: String, name: String },
    DeleteFile { directory: String, name: String },
    ListFiles { directory: String },
    ListDirectories { directory: String },
    GetDirectoryProvider { directory: String, name: String },
    CreateDirectory { directory: String, name: String },
    DeleteDirectory {
        directory: String,
        name: Option<String>,
    },
}

impl Call {
    /// Whether this call can remove or overwrite stored data.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Call::WriteFile { .. } | Call::DeleteFile { .. } | Call::DeleteDirectory { .. }
        )
    }
}

/// Shared, clonable view of the recorded calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    fn push(&self, call: Call) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn destructive_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_destructive).collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// A [`DirectoryProvider`] that forwards to an inner backend and records each call.
pub struct RecordingDirectory {
    inner: Arc<dyn DirectoryProvider>,
    log: CallLog,
}

impl RecordingDirectory {
    pub fn new(inner: impl DirectoryProvider + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
            log: CallLog::default(),
        }
    }

    /// Returns the log shared by this handle and all its sub-handles.
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    fn directory(&self) -> String {
        self.inner.directory_name().to_owned()
    }
}

#[async_trait]
impl DirectoryProvider for RecordingDirectory {
    fn directory_name(&self) -> &str {
        self.inner.directory_name()
    }

    async fn read_file(&self, name: &str) -> Result<String> {
        self.log.push(Call::ReadFile {
            directory: self.directory(),
            name: name.to_owned(),
        });
        self.inner.read_file(name).await
    }

    async fn write_file(&self, name: &str, content: &str) -> Result<()> {
        self.log.push(Call::WriteFile {
            directory: self.directory(),
            name: name.to_owned(),
        });
        self.inner.write_file(name, content).await
    }

    async fn delete_file(&self, name: &str) -> Result<()> {
        self.log.push(Call::DeleteFile {
            directory: self.directory(),
            name: name.to_owned(),
        });
        self.inner.delete_file(name).await
    }

    async fn list_files(&self) -> Result<Vec<String>> {
        self.log.push(Call::ListFiles { directory: self.directory() });
        self.inner.list_files().await
    }

    async fn list_directories(&self) -> Result<Vec<String>> {
        self.log.push(Call::ListDirectories { directory: self.directory() });
        self.inner.list_directories().await
    }

    async fn get_directory_provider(&self, name: &str) -> Result<Arc<dyn DirectoryProvider>> {
        self.log.push(Call::GetDirectoryProvider {
            directory: self.directory(),
            name: name.to_owned(),
        });
        let inner = self.inner.get_directory_provider(name).await?;
        Ok(Arc::new(RecordingDirectory {
            inner,
            log: self.log.clone(),
        }))
    }

    async fn create_directory(&self, name: &str) -> Result<()> {
        self.log.push(Call::CreateDirectory {
            directory: self.directory(),
            name: name.to_owned(),
        });
        self.inner.create_directory(name).await
    }

    async fn delete_directory(&self, name: Option<&str>) -> Result<()> {
        self.log.push(Call::DeleteDirectory {
            directory: self.directory(),
            name: name.map(str::to_owned),
        });
        self.inner.delete_directory(name).await
    }
}

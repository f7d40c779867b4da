//! Local filesystem backend.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tracing::trace;
use uuid::Uuid;

use super::DirectoryProvider;
use crate::error::{Result, StoreError};

/// A directory handle on the local filesystem.
///
/// Writes go to a hidden temporary file in the same directory which is then
/// renamed over the target, so a reader never sees a partially written file.
#[derive(Debug, Clone)]
pub struct FsDirectory {
    name: String,
    path: PathBuf,
}

impl FsDirectory {
    /// Binds a handle to an existing directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            name: String::new(),
            path: path.into(),
        }
    }

    /// Binds a handle to `path`, creating it (and its parents) if absent.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        fs::create_dir_all(&path).await?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn list_entries(&self, want_dirs: bool) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.path).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            if entry.file_type().await?.is_dir() == want_dirs {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

async fn has_entries(path: &Path) -> bool {
    match fs::read_dir(path).await {
        Ok(mut entries) => matches!(entries.next_entry().await, Ok(Some(_))),
        Err(_) => false,
    }
}

#[async_trait]
impl DirectoryProvider for FsDirectory {
    fn directory_name(&self) -> &str {
        &self.name
    }

    async fn read_file(&self, name: &str) -> Result<String> {
        match fs::read_to_string(self.path.join(name)).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::FileNotFound(name.to_owned()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, name: &str, content: &str) -> Result<()> {
        let target = self.path.join(name);
        let staging = self.path.join(format!(".{name}.{}.tmp", Uuid::new_v4()));
        trace!(path = %target.display(), "write_file");

        fs::write(&staging, content).await?;
        if let Err(e) = fs::rename(&staging, &target).await {
            let _ = fs::remove_file(&staging).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn delete_file(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.path.join(name)).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    async fn list_files(&self) -> Result<Vec<String>> {
        self.list_entries(false).await
    }

    async fn list_directories(&self) -> Result<Vec<String>> {
        self.list_entries(true).await
    }

    async fn get_directory_provider(&self, name: &str) -> Result<Arc<dyn DirectoryProvider>> {
        let path = self.path.join(name);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => Ok(Arc::new(FsDirectory {
                name: name.to_owned(),
                path,
            })),
            Ok(_) => Err(StoreError::DirectoryNotFound(name.to_owned())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::DirectoryNotFound(name.to_owned()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn create_directory(&self, name: &str) -> Result<()> {
        match fs::create_dir(self.path.join(name)).await {
            Err(e) if e.kind() != ErrorKind::AlreadyExists => Err(e.into()),
            _ => Ok(()),
        }
    }

    async fn delete_directory(&self, name: Option<&str>) -> Result<()> {
        let (label, path) = match name {
            Some(name) => (name.to_owned(), self.path.join(name)),
            None => (self.name.clone(), self.path.clone()),
        };
        match fs::remove_dir(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::DirectoryNotFound(label)),
            Err(e) => {
                if has_entries(&path).await {
                    trace!(error = %e, "remove_dir refused");
                    Err(StoreError::DirectoryNotEmpty(label))
                } else {
                    Err(e.into())
                }
            }
        }
    }
}

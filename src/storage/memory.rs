//! In-memory storage backend.
//!
//! The whole tree lives behind shared `Arc<Mutex<_>>` nodes, so every handle
//! obtained through [`DirectoryProvider::get_directory_provider`] observes the
//! same data as the root it came from. Entries are listed in name order.

use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::trace;

use super::DirectoryProvider;
use crate::error::{Result, StoreError};

#[derive(Debug, Default)]
struct Node {
    files: BTreeMap<String, String>,
    directories: BTreeMap<String, Arc<Mutex<Node>>>,
}

impl Node {
    fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }
}

fn lock(node: &Mutex<Node>) -> MutexGuard<'_, Node> {
    // A panic while holding the lock cannot leave a node half-written.
    node.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A directory handle into a shared in-memory tree.
#[derive(Debug, Clone)]
pub struct MemoryDirectory {
    name: String,
    node: Arc<Mutex<Node>>,
    parent: Option<Arc<Mutex<Node>>>,
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDirectory {
    /// Creates an empty root directory.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            node: Arc::new(Mutex::new(Node::default())),
            parent: None,
        }
    }

    fn child(&self, name: &str) -> Option<MemoryDirectory> {
        let node = lock(&self.node).directories.get(name).cloned()?;
        Some(MemoryDirectory {
            name: name.to_owned(),
            node,
            parent: Some(self.node.clone()),
        })
    }
}

#[async_trait]
impl DirectoryProvider for MemoryDirectory {
    fn directory_name(&self) -> &str {
        &self.name
    }

    async fn read_file(&self, name: &str) -> Result<String> {
        lock(&self.node)
            .files
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::FileNotFound(name.to_owned()))
    }

    async fn write_file(&self, name: &str, content: &str) -> Result<()> {
        trace!(directory = %self.name, file = name, "write_file");
        lock(&self.node).files.insert(name.to_owned(), content.to_owned());
        Ok(())
    }

    async fn delete_file(&self, name: &str) -> Result<()> {
        lock(&self.node).files.remove(name);
        Ok(())
    }

    async fn list_files(&self) -> Result<Vec<String>> {
        Ok(lock(&self.node).files.keys().cloned().collect())
    }

    async fn list_directories(&self) -> Result<Vec<String>> {
        Ok(lock(&self.node).directories.keys().cloned().collect())
    }

    async fn get_directory_provider(&self, name: &str) -> Result<Arc<dyn DirectoryProvider>> {
        match self.child(name) {
            Some(child) => Ok(Arc::new(child)),
            None => Err(StoreError::DirectoryNotFound(name.to_owned())),
        }
    }

    async fn create_directory(&self, name: &str) -> Result<()> {
        lock(&self.node).directories.entry(name.to_owned()).or_default();
        Ok(())
    }

    async fn delete_directory(&self, name: Option<&str>) -> Result<()> {
        let (parent, name, target) = match name {
            Some(name) => {
                let target = lock(&self.node)
                    .directories
                    .get(name)
                    .cloned()
                    .ok_or_else(|| StoreError::DirectoryNotFound(name.to_owned()))?;
                (self.node.clone(), name.to_owned(), target)
            }
            None => {
                let parent = self.parent.clone().ok_or_else(|| {
                    StoreError::Io(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "the root directory cannot delete itself",
                    ))
                })?;
                (parent, self.name.clone(), self.node.clone())
            }
        };

        if !lock(&target).is_empty() {
            return Err(StoreError::DirectoryNotEmpty(name));
        }

        let mut parent = lock(&parent);
        // Only detach the node this handle was bound to, not a re-created namesake.
        if parent.directories.get(&name).is_some_and(|n| Arc::ptr_eq(n, &target)) {
            parent.directories.remove(&name);
        }
        Ok(())
    }
}

//! Depth-first subtree removal.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tracing::debug;

use super::DirectoryProvider;
use crate::error::Result;

/// Removes the entire subtree `directory` denotes, including the directory itself.
///
/// Child directories are removed first, then the files at this level, then the
/// now-empty directory. Only the [`DirectoryProvider`] contract is used, so this
/// works against any backend. It bypasses the domain's "must be empty" guards:
/// callers check those before handing a subtree over.
///
/// Assumes no concurrent writer populates the subtree during the walk.
pub fn remove_tree(directory: Arc<dyn DirectoryProvider>) -> BoxFuture<'static, Result<()>> {
    async move {
        for name in directory.list_directories().await? {
            let child = directory.get_directory_provider(&name).await?;
            remove_tree(child).await?;
        }
        for file in directory.list_files().await? {
            directory.delete_file(&file).await?;
        }
        debug!(directory = directory.directory_name(), "Removing directory");
        directory.delete_directory(None).await
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryDirectory;

    async fn example_tree() -> MemoryDirectory {
        let root = MemoryDirectory::new();
        root.write_file("entity.json", "{}").await.unwrap();
        for (resource, ids) in [("subresource1", &["1", "2"][..]), ("subresource2", &["1"][..])] {
            root.create_directory(resource).await.unwrap();
            let dir = root.get_directory_provider(resource).await.unwrap();
            for id in ids {
                dir.create_directory(id).await.unwrap();
                let entity = dir.get_directory_provider(id).await.unwrap();
                entity.write_file("entity.json", "{}").await.unwrap();
            }
        }
        root
    }

    #[tokio::test]
    async fn removes_nested_files_and_directories_only_below_target() {
        let root = example_tree().await;
        let doomed = root.get_directory_provider("subresource1").await.unwrap();
        doomed.write_file("something.json", "balflkslfksflsk").await.unwrap();
        let nested = doomed.get_directory_provider("1").await.unwrap();

        remove_tree(doomed.clone()).await.unwrap();

        assert!(doomed.list_directories().await.unwrap().is_empty());
        assert!(doomed.list_files().await.unwrap().is_empty());
        assert!(nested.list_files().await.unwrap().is_empty());
        assert_eq!(root.list_directories().await.unwrap(), vec!["subresource2"]);
        let sibling = root.get_directory_provider("subresource2").await.unwrap();
        assert_eq!(sibling.list_directories().await.unwrap(), vec!["1"]);
        assert_eq!(root.list_files().await.unwrap(), vec!["entity.json"]);
    }

    #[tokio::test]
    async fn empty_directory_is_removed_immediately() {
        let root = MemoryDirectory::new();
        root.create_directory("empty").await.unwrap();
        let empty = root.get_directory_provider("empty").await.unwrap();

        remove_tree(empty).await.unwrap();
        assert!(root.list_directories().await.unwrap().is_empty());
    }
}

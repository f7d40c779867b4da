use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{open_root, Entity};
use crate::error::Result;
use crate::serializer::JsonSerializer;
use crate::storage::{DirectoryProvider, FsDirectory, MemoryDirectory};

/// Environment variable selecting a filesystem root for the store.
pub const ROOT_ENV: &str = "NTT_STORE_ROOT";

/// Environment variable turning on indented JSON documents.
pub const PRETTY_ENV: &str = "NTT_PRETTY_JSON";

/// Where the tree is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Process-local tree, lost on exit.
    #[default]
    Memory,
    /// A directory on the local filesystem, created if absent.
    Filesystem { root: PathBuf },
}

/// Settings needed to open a store.
///
/// # Environment Variables
///
/// - `NTT_STORE_ROOT=/var/lib/ntt` - Use the filesystem backend rooted there
/// - `NTT_PRETTY_JSON=1` - Write indented documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: BackendConfig,
    pub pretty_json: bool,
}

impl StoreConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(env::var(ROOT_ENV).ok(), env::var(PRETTY_ENV).ok())
    }

    fn from_vars(root: Option<String>, pretty: Option<String>) -> Self {
        let backend = match root.filter(|r| !r.trim().is_empty()) {
            Some(root) => BackendConfig::Filesystem { root: root.into() },
            None => BackendConfig::Memory,
        };
        let pretty_json = pretty
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Self {
            backend,
            pretty_json,
        }
    }

    /// Builds the backend and serializer, returning the root entity.
    pub async fn open(&self) -> Result<Entity> {
        let directory: Arc<dyn DirectoryProvider> = match &self.backend {
            BackendConfig::Memory => Arc::new(MemoryDirectory::new()),
            BackendConfig::Filesystem { root } => Arc::new(FsDirectory::open(root).await?),
        };
        let serializer = if self.pretty_json {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::new()
        };
        info!(backend = ?self.backend, pretty = self.pretty_json, "Store opened");
        Ok(open_root(directory, Arc::new(serializer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_selects_backend_and_format() {
        assert_eq!(StoreConfig::from_vars(None, None), StoreConfig::default());

        let config = StoreConfig::from_vars(Some("/tmp/ntt".into()), Some("TRUE".into()));
        assert_eq!(
            config.backend,
            BackendConfig::Filesystem {
                root: "/tmp/ntt".into()
            }
        );
        assert!(config.pretty_json);

        let blank = StoreConfig::from_vars(Some("  ".into()), Some("0".into()));
        assert_eq!(blank.backend, BackendConfig::Memory);
        assert!(!blank.pretty_json);
    }

    #[test]
    fn deserializes_from_json() {
        let raw = r#"{"backend":{"kind":"filesystem","root":"data"},"pretty_json":true}"#;
        let config: StoreConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.backend, BackendConfig::Filesystem { root: "data".into() });

        let defaults: StoreConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, StoreConfig::default());
    }

    #[tokio::test]
    async fn opens_a_filesystem_store() {
        let tmp = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            backend: BackendConfig::Filesystem {
                root: tmp.path().join("store"),
            },
            pretty_json: true,
        };
        let root = config.open().await.unwrap();
        root.save(&serde_json::json!({"hello": "world"})).await.unwrap();

        let raw = std::fs::read_to_string(tmp.path().join("store").join("entity.json")).unwrap();
        assert!(raw.contains('\n'));
    }
}

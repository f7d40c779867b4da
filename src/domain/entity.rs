//! The document node of the tree.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::cursor::{ChildLookup, ResourceCursor};
use super::{EntityFactoryProvider, Resource, ResourceFactoryProvider, StoreContext};
use crate::error::{Result, StoreError};
use crate::serializer::Document;
use crate::storage::{remove_tree, DirectoryProvider};

/// Reserved file name holding an entity's document inside its directory.
pub const ENTITY_FILENAME: &str = "entity.json";

/// A view of one tree node: an optional document plus named child resources.
///
/// An `Entity` is a lightweight handle bound to a directory. It caches nothing;
/// every call goes to the backend. Its id is fixed at creation.
#[derive(Clone)]
pub struct Entity {
    id: Option<String>,
    directory: Arc<dyn DirectoryProvider>,
    context: StoreContext,
    entities: EntityFactoryProvider,
    resources: ResourceFactoryProvider,
}

impl Entity {
    /// Binds an entity to `directory`. `entities` is the provider that built
    /// this entity; it is handed to the resource factory so the next level can
    /// build entities in turn.
    pub fn bind(
        directory: Arc<dyn DirectoryProvider>,
        id: Option<String>,
        context: StoreContext,
        entities: EntityFactoryProvider,
        resources: ResourceFactoryProvider,
    ) -> Self {
        Self {
            id,
            directory,
            context,
            entities,
            resources,
        }
    }

    /// Identifier within the owning resource; `None` for a root entity.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn directory(&self) -> &Arc<dyn DirectoryProvider> {
        &self.directory
    }

    fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("<root>")
    }

    /// Reads and deserializes this entity's document.
    ///
    /// Fails with [`StoreError::FileNotFound`] when nothing has been saved yet,
    /// which is normal for a node that only exists to hold resources.
    #[instrument(level = "debug", skip(self), fields(entity = self.label()))]
    pub async fn load(&self) -> Result<Document> {
        let text = self.directory.read_file(ENTITY_FILENAME).await?;
        self.context.serializer().deserialize(&text)
    }

    /// [`load`](Self::load) into a typed value.
    pub async fn load_as<T: DeserializeOwned>(&self) -> Result<T> {
        let document = self.load().await?;
        serde_json::from_value(document).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Replaces this entity's document.
    ///
    /// `null` and `""` are rejected with [`StoreError::EmptyContent`] before any I/O.
    #[instrument(level = "debug", skip(self, content), fields(entity = self.label()))]
    pub async fn save(&self, content: &Document) -> Result<()> {
        if content.is_null() || content.as_str() == Some("") {
            warn!("Refusing to save empty content");
            return Err(StoreError::EmptyContent);
        }
        let text = self.context.serializer().serialize(content)?;
        self.directory.write_file(ENTITY_FILENAME, &text).await?;
        info!(bytes = text.len(), "Saved");
        Ok(())
    }

    /// [`save`](Self::save) a typed value.
    pub async fn save_as<T: Serialize + ?Sized>(&self, content: &T) -> Result<()> {
        let document = serde_json::to_value(content)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.save(&document).await
    }

    /// Names of the child resources, in backend listing order.
    pub async fn list_resources(&self) -> Result<Vec<String>> {
        self.directory.list_directories().await
    }

    /// Binds the existing child resource `name`.
    #[instrument(level = "debug", skip(self), fields(entity = self.label()))]
    pub async fn get_resource(&self, name: &str) -> Result<Resource> {
        self.context.check_name(name)?;
        let directory = self.directory.get_directory_provider(name).await?;
        let factory = self.resources.provide(self.context.clone(), self.entities);
        Ok(factory.create(directory, name.to_owned()))
    }

    /// Creates the child resource `name` if absent, then binds it.
    ///
    /// Creating an existing resource leaves its entities untouched.
    #[instrument(level = "debug", skip(self), fields(entity = self.label()))]
    pub async fn create_resource(&self, name: &str) -> Result<Resource> {
        self.context.check_name(name)?;
        self.directory.create_directory(name).await?;
        debug!(resource = name, "Resource directory ensured");
        self.get_resource(name).await
    }

    /// Removes this entity's whole directory.
    ///
    /// Fails with [`StoreError::EntityNotEmpty`], without touching storage, while
    /// the entity owns any resource. The root entity is never deleted:
    /// [`StoreError::RootNotDeletable`] is returned before any I/O.
    #[instrument(level = "debug", skip(self), fields(entity = self.label()))]
    pub async fn delete(&self) -> Result<()> {
        if self.id.is_none() {
            warn!("Refusing to delete the root entity");
            return Err(StoreError::RootNotDeletable);
        }
        let resources = self.list_resources().await?;
        if !resources.is_empty() {
            warn!(count = resources.len(), "Entity still owns resources");
            return Err(StoreError::EntityNotEmpty);
        }
        remove_tree(self.directory.clone()).await?;
        info!("Deleted");
        Ok(())
    }

    /// Lazily walks the child resources present right now.
    pub async fn iterate_resources(&self) -> Result<ResourceCursor> {
        let names = self.list_resources().await?;
        Ok(ResourceCursor::new(self.clone(), names))
    }
}

#[async_trait]
impl ChildLookup for Entity {
    type Child = Resource;

    async fn lookup(&self, name: &str) -> Result<Resource> {
        self.get_resource(name).await
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("directory", &self.directory.directory_name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::domain::{open_root, DocumentEntityFactory, ResourceFactory};
    use crate::serializer::JsonSerializer;
    use crate::storage::mock::RecordingDirectory;
    use crate::storage::MemoryDirectory;

    async fn example_root() -> (MemoryDirectory, Entity) {
        let storage = MemoryDirectory::new();
        storage
            .write_file(ENTITY_FILENAME, r#"{"id":1,"content":"main entity"}"#)
            .await
            .unwrap();
        for (resource, ids) in [("subresource1", &["1", "2"][..]), ("subresource2", &["1"][..])] {
            storage.create_directory(resource).await.unwrap();
            let dir = storage.get_directory_provider(resource).await.unwrap();
            for id in ids {
                dir.create_directory(id).await.unwrap();
            }
        }
        let root = open_root(Arc::new(storage.clone()), Arc::new(JsonSerializer::new()));
        (storage, root)
    }

    #[tokio::test]
    async fn loads_existing_document() {
        let (_, root) = example_root().await;
        let doc = root.load().await.unwrap();
        assert_eq!(doc["content"], "main entity");
        assert_eq!(doc["id"], 1);
        assert_eq!(root.id(), None);
    }

    #[tokio::test]
    async fn save_replaces_the_stored_document() {
        let (storage, root) = example_root().await;
        let mut doc = root.load().await.unwrap();
        doc["something"] = json!("rtjkwgelfbmvdlksmfww");
        root.save(&doc).await.unwrap();

        let raw = storage.read_file(ENTITY_FILENAME).await.unwrap();
        let stored: Document = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored["something"], "rtjkwgelfbmvdlksmfww");
    }

    #[tokio::test]
    async fn empty_content_is_rejected_and_previous_document_kept() {
        let (_, root) = example_root().await;
        for empty in [Document::Null, json!("")] {
            assert!(matches!(root.save(&empty).await, Err(StoreError::EmptyContent)));
        }
        assert_eq!(root.load().await.unwrap()["content"], "main entity");
    }

    #[tokio::test]
    async fn typed_round_trip() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Order {
            total: u32,
            lines: Vec<String>,
        }

        let (_, root) = example_root().await;
        let order = Order {
            total: 10,
            lines: vec!["widget".into()],
        };
        root.save_as(&order).await.unwrap();
        assert_eq!(root.load_as::<Order>().await.unwrap(), order);
    }

    #[tokio::test]
    async fn lists_and_gets_resources() {
        let (_, root) = example_root().await;
        assert_eq!(root.list_resources().await.unwrap(), vec!["subresource1", "subresource2"]);

        let resource = root.get_resource("subresource1").await.unwrap();
        assert_eq!(resource.name(), "subresource1");

        let err = root.get_resource("subresource2324524").await.unwrap_err();
        assert_eq!(err.to_string(), "Directory does not exist: subresource2324524");
    }

    #[tokio::test]
    async fn create_resource_is_idempotent() {
        let (_, root) = example_root().await;
        let existing = root.create_resource("subresource1").await.unwrap();
        assert_eq!(existing.list_entities().await.unwrap(), vec!["1", "2"]);

        let fresh = root.create_resource("newsubresource").await.unwrap();
        assert_eq!(fresh.name(), "newsubresource");
        assert!(fresh.list_entities().await.unwrap().is_empty());
        assert!(root.list_resources().await.unwrap().contains(&"newsubresource".to_string()));
    }

    #[tokio::test]
    async fn invalid_resource_names_never_reach_storage() {
        let recorder = RecordingDirectory::new(MemoryDirectory::new());
        let log = recorder.log();
        let root = open_root(Arc::new(recorder), Arc::new(JsonSerializer::new()));

        for name in ["something/someone", "", "..", "a\\b"] {
            let err = root.create_resource(name).await.unwrap_err();
            assert!(matches!(err, StoreError::InvalidIdentifier { .. }), "{name:?}");
            assert!(root.get_resource(name).await.is_err());
        }
        assert!(log.calls().is_empty());
    }

    #[tokio::test]
    async fn delete_refuses_while_resources_remain() {
        let recorder = RecordingDirectory::new(MemoryDirectory::new());
        let log = recorder.log();
        let root = open_root(Arc::new(recorder), Arc::new(JsonSerializer::new()));
        let orders = root.create_resource("orders").await.unwrap();
        let entity = orders.create_entity_with_id("1").await.unwrap();
        entity.create_resource("lines").await.unwrap();
        log.clear();

        assert!(matches!(entity.delete().await, Err(StoreError::EntityNotEmpty)));
        assert!(log.destructive_calls().is_empty());
        assert_eq!(entity.list_resources().await.unwrap(), vec!["lines"]);
    }

    #[tokio::test]
    async fn root_delete_is_refused_before_any_io() {
        let recorder = RecordingDirectory::new(MemoryDirectory::new());
        let log = recorder.log();
        let root = open_root(Arc::new(recorder), Arc::new(JsonSerializer::new()));
        root.save(&json!({"keep": 1})).await.unwrap();
        log.clear();

        assert!(matches!(root.delete().await, Err(StoreError::RootNotDeletable)));
        assert!(log.calls().is_empty());
        assert_eq!(root.load().await.unwrap()["keep"], 1);
    }

    #[tokio::test]
    async fn delete_removes_an_empty_entity() {
        let (storage, root) = example_root().await;
        let resource = root.get_resource("subresource2").await.unwrap();
        let entity = resource.get_entity("1").await.unwrap();
        entity.save(&json!({"content": "subresource2/1"})).await.unwrap();
        assert!(entity.list_resources().await.unwrap().is_empty());

        entity.delete().await.unwrap();

        let dir = storage.get_directory_provider("subresource2").await.unwrap();
        assert!(dir.list_directories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn iterates_resources_in_listing_order_then_stops() {
        let (_, root) = example_root().await;
        let mut cursor = root.iterate_resources().await.unwrap();
        assert_eq!(cursor.remaining(), 2);

        let mut names = Vec::new();
        while let Some(resource) = cursor.next().await {
            let resource = resource.unwrap();
            assert_eq!(resource.directory().directory_name(), resource.name());
            names.push(resource.name().to_owned());
        }
        assert_eq!(names, vec!["subresource1", "subresource2"]);
        assert!(cursor.next().await.is_none());
        assert!(cursor.next().await.is_none());
    }

    #[tokio::test]
    async fn iteration_uses_the_name_snapshot() {
        let (_, root) = example_root().await;
        let mut cursor = root.iterate_resources().await.unwrap();
        root.create_resource("late").await.unwrap();

        let mut seen = 0;
        while let Some(resource) = cursor.next().await {
            resource.unwrap();
            seen += 1;
        }
        assert_eq!(seen, 2);
    }

    static BUILT: AtomicUsize = AtomicUsize::new(0);

    struct CountingResourceFactory {
        context: StoreContext,
        entities: EntityFactoryProvider,
    }

    fn counting_factory(
        context: StoreContext,
        entities: EntityFactoryProvider,
    ) -> Box<dyn ResourceFactory> {
        Box::new(CountingResourceFactory { context, entities })
    }

    const COUNTING: ResourceFactoryProvider = ResourceFactoryProvider::new(counting_factory);

    impl ResourceFactory for CountingResourceFactory {
        fn create(&self, directory: Arc<dyn DirectoryProvider>, name: String) -> Resource {
            BUILT.fetch_add(1, Ordering::SeqCst);
            Resource::bind(directory, name, self.context.clone(), self.entities, COUNTING)
        }
    }

    #[tokio::test]
    async fn get_resource_goes_through_the_injected_resource_factory() {
        let (storage, _) = example_root().await;
        let context = StoreContext::with_default_validator(Arc::new(JsonSerializer::new()));
        let root = DocumentEntityFactory::PROVIDER
            .provide(context, COUNTING)
            .create(Arc::new(storage), None);

        let before = BUILT.load(Ordering::SeqCst);
        let resource = root.get_resource("subresource1").await.unwrap();
        assert_eq!(BUILT.load(Ordering::SeqCst), before + 1);

        // The next level still builds entities, which build resources through the same provider.
        let entity = resource.get_entity("1").await.unwrap();
        entity.create_resource("nested").await.unwrap();
        assert_eq!(BUILT.load(Ordering::SeqCst), before + 2);
    }
}

//! The collection node of the tree.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::cursor::{ChildLookup, EntityCursor};
use super::{Entity, EntityFactoryProvider, ResourceFactoryProvider, StoreContext};
use crate::error::{Result, StoreError};
use crate::storage::{remove_tree, DirectoryProvider};
use crate::validation::Identifier;

/// Synthesizes an entity id from two random UUIDs.
///
/// No uniqueness check is made before the directory is created, so the id
/// carries far more entropy than a single UUID.
pub fn generate_entity_id() -> String {
    format!("{}-{}", Uuid::new_v4(), Uuid::new_v4())
}

/// A named collection of entities, keyed by id.
#[derive(Clone)]
pub struct Resource {
    name: String,
    directory: Arc<dyn DirectoryProvider>,
    context: StoreContext,
    entities: EntityFactoryProvider,
    resources: ResourceFactoryProvider,
}

impl Resource {
    /// Binds a resource to `directory`. `resources` is the provider that built
    /// this resource; it is handed to the entity factory so the next level can
    /// build resources in turn.
    pub fn bind(
        directory: Arc<dyn DirectoryProvider>,
        name: String,
        context: StoreContext,
        entities: EntityFactoryProvider,
        resources: ResourceFactoryProvider,
    ) -> Self {
        Self {
            name,
            directory,
            context,
            entities,
            resources,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self) -> &Arc<dyn DirectoryProvider> {
        &self.directory
    }

    /// Ids of the entities in this resource.
    pub async fn list_entities(&self) -> Result<Vec<String>> {
        self.directory.list_directories().await
    }

    /// Binds the existing entity `id`. Numeric ids are normalized to decimal text.
    #[instrument(level = "debug", skip(self, id), fields(resource = %self.name))]
    pub async fn get_entity(&self, id: impl Into<Identifier>) -> Result<Entity> {
        let id = id.into().canonical();
        self.context.check_name(&id)?;
        let directory = self.directory.get_directory_provider(&id).await?;
        let factory = self.entities.provide(self.context.clone(), self.resources);
        Ok(factory.create(directory, Some(id)))
    }

    /// Creates an entity under a generated id.
    pub async fn create_entity(&self) -> Result<Entity> {
        self.create(Identifier::Text(generate_entity_id())).await
    }

    /// Creates the entity `id` if absent, then binds it.
    ///
    /// Only the directory is created; [`Entity::load`] fails until a document
    /// is saved.
    pub async fn create_entity_with_id(&self, id: impl Into<Identifier>) -> Result<Entity> {
        self.create(id.into()).await
    }

    #[instrument(level = "debug", skip(self), fields(resource = %self.name))]
    async fn create(&self, id: Identifier) -> Result<Entity> {
        let id = id.canonical();
        self.context.check_name(&id)?;
        self.directory.create_directory(&id).await?;
        info!(entity_id = %id, "Created");
        self.get_entity(id).await
    }

    /// Deletes the entity `id` and its directory.
    ///
    /// Fails with [`StoreError::EntityNotEmpty`] while the entity owns any resource.
    #[instrument(level = "debug", skip(self, id), fields(resource = %self.name))]
    pub async fn delete_entity(&self, id: impl Into<Identifier>) -> Result<()> {
        let entity = self.get_entity(id).await?;
        entity.delete().await
    }

    /// Removes this resource's whole directory.
    ///
    /// Fails with [`StoreError::ResourceNotEmpty`], without touching storage,
    /// while any entity remains.
    #[instrument(level = "debug", skip(self), fields(resource = %self.name))]
    pub async fn delete(&self) -> Result<()> {
        let entities = self.list_entities().await?;
        if !entities.is_empty() {
            warn!(count = entities.len(), "Resource still holds entities");
            return Err(StoreError::ResourceNotEmpty);
        }
        remove_tree(self.directory.clone()).await?;
        info!("Deleted");
        Ok(())
    }

    /// Lazily walks the entities present right now.
    pub async fn iterate_entities(&self) -> Result<EntityCursor> {
        let ids = self.list_entities().await?;
        Ok(EntityCursor::new(self.clone(), ids))
    }
}

#[async_trait]
impl ChildLookup for Resource {
    type Child = Entity;

    async fn lookup(&self, name: &str) -> Result<Entity> {
        self.get_entity(name).await
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource").field("name", &self.name).finish_non_exhaustive()
    }
}

//! Mutually recursive constructors for entities and resources.
//!
//! An [`Entity`] never builds a [`Resource`] directly and vice versa. Each holds
//! a provider for the *other* level's factory, and hands its own provider along
//! when it asks for one. That closes the loop without either type knowing how
//! the next level is constructed, so the tree recurses to any depth:
//!
//! ```text
//! EntityFactoryProvider(ctx, resources) -> EntityFactory -> Entity
//!     Entity::get_resource -> resources(ctx, entities) -> ResourceFactory -> Resource
//!         Resource::get_entity -> entities(ctx, resources) -> EntityFactory -> Entity ...
//! ```

use std::fmt;
use std::sync::Arc;

use super::{Entity, Resource, StoreContext};
use crate::storage::DirectoryProvider;

/// Binds a directory handle into an [`Entity`].
pub trait EntityFactory: Send + Sync {
    fn create(&self, directory: Arc<dyn DirectoryProvider>, id: Option<String>) -> Entity;
}

/// Binds a directory handle into a [`Resource`].
pub trait ResourceFactory: Send + Sync {
    fn create(&self, directory: Arc<dyn DirectoryProvider>, name: String) -> Resource;
}

type EntityFactoryFn = fn(StoreContext, ResourceFactoryProvider) -> Box<dyn EntityFactory>;
type ResourceFactoryFn = fn(StoreContext, EntityFactoryProvider) -> Box<dyn ResourceFactory>;

/// Builds an [`EntityFactory`] from the shared context and the sibling provider.
#[derive(Clone, Copy)]
pub struct EntityFactoryProvider(EntityFactoryFn);

impl EntityFactoryProvider {
    pub const fn new(build: EntityFactoryFn) -> Self {
        Self(build)
    }

    pub fn provide(
        self,
        context: StoreContext,
        resources: ResourceFactoryProvider,
    ) -> Box<dyn EntityFactory> {
        (self.0)(context, resources)
    }
}

impl fmt::Debug for EntityFactoryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EntityFactoryProvider")
    }
}

/// Builds a [`ResourceFactory`] from the shared context and the sibling provider.
#[derive(Clone, Copy)]
pub struct ResourceFactoryProvider(ResourceFactoryFn);

impl ResourceFactoryProvider {
    pub const fn new(build: ResourceFactoryFn) -> Self {
        Self(build)
    }

    pub fn provide(
        self,
        context: StoreContext,
        entities: EntityFactoryProvider,
    ) -> Box<dyn ResourceFactory> {
        (self.0)(context, entities)
    }
}

impl fmt::Debug for ResourceFactoryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResourceFactoryProvider")
    }
}

/// The stock entity factory: documents live in [`ENTITY_FILENAME`](super::ENTITY_FILENAME).
pub struct DocumentEntityFactory {
    context: StoreContext,
    resources: ResourceFactoryProvider,
}

impl DocumentEntityFactory {
    pub const PROVIDER: EntityFactoryProvider = EntityFactoryProvider::new(Self::build);

    fn build(context: StoreContext, resources: ResourceFactoryProvider) -> Box<dyn EntityFactory> {
        Box::new(Self { context, resources })
    }
}

impl EntityFactory for DocumentEntityFactory {
    fn create(&self, directory: Arc<dyn DirectoryProvider>, id: Option<String>) -> Entity {
        Entity::bind(directory, id, self.context.clone(), Self::PROVIDER, self.resources)
    }
}

/// The stock resource factory.
pub struct DocumentResourceFactory {
    context: StoreContext,
    entities: EntityFactoryProvider,
}

impl DocumentResourceFactory {
    pub const PROVIDER: ResourceFactoryProvider = ResourceFactoryProvider::new(Self::build);

    fn build(context: StoreContext, entities: EntityFactoryProvider) -> Box<dyn ResourceFactory> {
        Box::new(Self { context, entities })
    }
}

impl ResourceFactory for DocumentResourceFactory {
    fn create(&self, directory: Arc<dyn DirectoryProvider>, name: String) -> Resource {
        Resource::bind(directory, name, self.context.clone(), self.entities, Self::PROVIDER)
    }
}

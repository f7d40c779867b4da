//! The document-store domain: entities, resources and their factories.
//!
//! # Main Components
//!
//! - [`Entity`] - A node holding an optional document and named resources
//! - [`Resource`] - A named collection of entities keyed by id
//! - [`EntityFactory`] / [`ResourceFactory`] - Mutually recursive constructors
//! - [`Cursor`] - Lazy, single-pass traversal of a node's children
//!
//! Entities and resources are disposable views bound to a directory handle.
//! They keep no state between calls beyond that handle and their identifier.

pub mod context;
pub mod cursor;
pub mod entity;
pub mod factory;
pub mod resource;

pub use context::StoreContext;
pub use cursor::{ChildLookup, Cursor, EntityCursor, ResourceCursor};
pub use entity::{Entity, ENTITY_FILENAME};
pub use factory::{
    DocumentEntityFactory, DocumentResourceFactory, EntityFactory, EntityFactoryProvider,
    ResourceFactory, ResourceFactoryProvider,
};
pub use resource::{generate_entity_id, Resource};

use std::sync::Arc;

use crate::serializer::Serializer;
use crate::storage::DirectoryProvider;

/// Binds the root entity of a tree stored in `directory`.
pub fn open_root(directory: Arc<dyn DirectoryProvider>, serializer: Arc<dyn Serializer>) -> Entity {
    open_root_with(directory, StoreContext::with_default_validator(serializer))
}

/// Like [`open_root`], with an explicit context (e.g. a custom validator).
pub fn open_root_with(directory: Arc<dyn DirectoryProvider>, context: StoreContext) -> Entity {
    DocumentEntityFactory::PROVIDER
        .provide(context, DocumentResourceFactory::PROVIDER)
        .create(directory, None)
}

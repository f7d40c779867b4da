//! # ntt
//!
//! > **A hierarchical document store on top of plain directories and files.**
//!
//! The store models a tree of named **resources** (collections) holding
//! **entities** (documents). Every entity can own further resources, to any
//! depth. The tree is persisted through a pluggable backend that only has to
//! offer directory and file primitives.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Why documents on directories?
//!
//! A directory tree already gives us a namespace with unique child names, cheap
//! listing, and idempotent creation. The domain layer adds what a file system
//! does not know about:
//! - **Validated identifiers**: no segment can escape its parent.
//! - **Guarded deletion**: a node that still has children cannot be deleted.
//! - **Whole-document writes**: a save either replaces the document or fails.
//!
//! ### Mutual recursion without a depth limit
//! [`Entity`] and [`Resource`] never construct each other directly. Each asks a
//! factory provider for the next level, passing its own provider along. See
//! [`domain::factory`].
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Domain ([`domain`])
//! - **Role**: Entity/resource lifecycle, id generation, traversal.
//! - **Key items**: [`Entity`], [`Resource`], [`open_root`].
//!
//! ### 2. The Backends ([`storage`])
//! - **Role**: The [`DirectoryProvider`] contract plus in-memory and filesystem implementations.
//! - **Key items**: [`MemoryDirectory`], [`FsDirectory`], [`storage::remove_tree`].
//!
//! ### 3. The Policies ([`validation`], [`serializer`])
//! - **Role**: Segment-name rules and document encoding, injected via [`StoreContext`].
//!
//! ### 4. The Wiring ([`runtime`])
//! - **Role**: Configuration and tracing setup for applications.
//!
//! ## 🚀 Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use ntt::{open_root, JsonSerializer, MemoryDirectory};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> ntt::Result<()> {
//! let root = open_root(Arc::new(MemoryDirectory::new()), Arc::new(JsonSerializer::new()));
//! let orders = root.create_resource("orders").await?;
//! let order = orders.create_entity_with_id(42).await?;
//! order.save(&json!({ "total": 10 })).await?;
//!
//! let loaded = root.get_resource("orders").await?.get_entity(42).await?.load().await?;
//! assert_eq!(loaded["total"], 10);
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub mod error;
pub mod runtime;
pub mod serializer;
pub mod storage;
pub mod validation;

// Re-export core types for convenience
pub use domain::{open_root, open_root_with, Entity, Resource, StoreContext, ENTITY_FILENAME};
pub use error::{Result, StoreError};
pub use serializer::{Document, JsonSerializer, Serializer};
pub use storage::{DirectoryProvider, FsDirectory, MemoryDirectory};
pub use validation::{Identifier, NameError, NameValidator, NoSpecialCharsValidator};

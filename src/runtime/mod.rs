//! Runtime wiring for applications embedding the store.
//!
//! # Main Components
//!
//! - [`StoreConfig`] - Backend selection, loadable from the environment or serde
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod config;
pub mod tracing;

pub use self::config::{BackendConfig, StoreConfig, PRETTY_ENV, ROOT_ENV};
pub use self::tracing::setup_tracing;

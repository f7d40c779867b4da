//! Document (de)serialization.

use serde_json::Value;

use crate::error::{Result, StoreError};

/// The document stored at an entity node.
pub type Document = Value;

/// Converts documents to and from their persisted text form.
pub trait Serializer: Send + Sync {
    fn serialize(&self, document: &Document) -> Result<String>;
    fn deserialize(&self, text: &str) -> Result<Document>;
}

/// JSON serializer backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indent written documents for human readers.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Serializer for JsonSerializer {
    fn serialize(&self, document: &Document) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(document)
        } else {
            serde_json::to_string(document)
        };
        text.map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn deserialize(&self, text: &str) -> Result<Document> {
        serde_json::from_str(text).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

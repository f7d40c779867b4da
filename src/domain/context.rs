//! Shared policy handed to every entity and resource.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::error::{Result, StoreError};
use crate::serializer::Serializer;
use crate::validation::{NameValidator, NoSpecialCharsValidator};

/// The serializer and name validator a tree is bound with.
///
/// Cloning is cheap: both halves are reference counted.
#[derive(Clone)]
pub struct StoreContext {
    serializer: Arc<dyn Serializer>,
    validator: Arc<dyn NameValidator>,
}

impl StoreContext {
    pub fn new(serializer: Arc<dyn Serializer>, validator: Arc<dyn NameValidator>) -> Self {
        Self {
            serializer,
            validator,
        }
    }

    /// Uses [`NoSpecialCharsValidator`] for segment names.
    pub fn with_default_validator(serializer: Arc<dyn Serializer>) -> Self {
        Self::new(serializer, Arc::new(NoSpecialCharsValidator))
    }

    pub fn serializer(&self) -> &dyn Serializer {
        self.serializer.as_ref()
    }

    pub fn validator(&self) -> &dyn NameValidator {
        self.validator.as_ref()
    }

    /// Validates a segment name, mapping rejection to [`StoreError::InvalidIdentifier`].
    pub(crate) fn check_name(&self, name: &str) -> Result<()> {
        self.validator.validate(name).map_err(|reason| {
            warn!(name, %reason, "Rejected identifier");
            StoreError::InvalidIdentifier {
                name: name.to_owned(),
                reason,
            }
        })
    }
}

impl fmt::Debug for StoreContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreContext").finish_non_exhaustive()
    }
}

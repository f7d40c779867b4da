//! Lazy, single-pass traversal over a node's children.

use async_trait::async_trait;
use futures::stream::{self, Stream};

use crate::error::Result;

/// A node that can resolve one of its children by name.
#[async_trait]
pub trait ChildLookup: Send + Sync {
    type Child: Send;

    async fn lookup(&self, name: &str) -> Result<Self::Child>;
}

/// Pull-based cursor over the children of `P`.
///
/// The child names are captured once when the cursor is created; each call to
/// [`Cursor::next`] resolves one more child. Changes made to the tree while
/// iterating are not reflected. Once exhausted, `next` keeps returning `None`.
pub struct Cursor<P: ChildLookup> {
    parent: P,
    names: std::vec::IntoIter<String>,
}

/// Cursor over an entity's resources.
pub type ResourceCursor = Cursor<super::Entity>;

/// Cursor over a resource's entities.
pub type EntityCursor = Cursor<super::Resource>;

impl<P: ChildLookup> Cursor<P> {
    pub(crate) fn new(parent: P, names: Vec<String>) -> Self {
        Self {
            parent,
            names: names.into_iter(),
        }
    }

    /// Resolves the next child, or `None` when the snapshot is exhausted.
    #[allow(clippy::should_implement_trait)]
    pub async fn next(&mut self) -> Option<Result<P::Child>> {
        let name = self.names.next()?;
        Some(self.parent.lookup(&name).await)
    }

    /// Number of children not yet yielded.
    pub fn remaining(&self) -> usize {
        self.names.len()
    }

    /// Adapts the cursor into a [`Stream`].
    pub fn into_stream(self) -> impl Stream<Item = Result<P::Child>> {
        stream::unfold(self, |mut cursor| async move {
            let item = cursor.next().await?;
            Some((item, cursor))
        })
    }
}

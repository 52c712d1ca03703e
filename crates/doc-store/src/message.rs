//! # Collection Messages
//!
//! Request types exchanged between a `CollectionClient` and its `CollectionActor`,
//! plus the [`ListQuery`] used for ordered and ranged listings.

use crate::document::Document;
use crate::error::StoreError;
use std::ops::{Bound, RangeBounds};
use tokio::sync::oneshot;

/// Type alias for the one-shot reply channel used by collections.
pub type Reply<T> = oneshot::Sender<Result<T, StoreError>>;

/// Direction of an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// An ordered listing over a collection, optionally restricted to a key range.
///
/// Documents are ordered by [`Document::sort_key`]; equal keys fall back to id order.
#[derive(Debug, Clone)]
pub struct ListQuery<K> {
    pub order: SortOrder,
    pub start: Bound<K>,
    pub end: Bound<K>,
}

impl<K> ListQuery<K> {
    /// Every document, lowest key first.
    pub fn ascending() -> Self {
        Self {
            order: SortOrder::Ascending,
            start: Bound::Unbounded,
            end: Bound::Unbounded,
        }
    }

    /// Every document, highest key first.
    pub fn descending() -> Self {
        Self {
            order: SortOrder::Descending,
            ..Self::ascending()
        }
    }

    /// Only documents whose key is `>= key`.
    pub fn starting_at(mut self, key: K) -> Self {
        self.start = Bound::Included(key);
        self
    }

    /// Only documents whose key is `< key`.
    pub fn ending_before(mut self, key: K) -> Self {
        self.end = Bound::Excluded(key);
        self
    }

    /// Whether a key falls inside the query range.
    pub fn contains(&self, key: &K) -> bool
    where
        K: PartialOrd,
    {
        (self.start.as_ref(), self.end.as_ref()).contains(key)
    }
}

/// Internal message type sent to a collection.
///
/// The variants map to the store's CRUD surface plus ordered listing and custom
/// single-document actions. Each variant carries the reply channel for its result.
#[derive(Debug)]
pub enum CollectionRequest<T: Document> {
    Create {
        params: T::Create,
        respond_to: Reply<T>,
    },
    Get {
        id: T::Id,
        respond_to: Reply<Option<T>>,
    },
    List {
        query: ListQuery<T::SortKey>,
        respond_to: Reply<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Reply<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Reply<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Reply<T::ActionResult>,
    },
}

impl<T: Document> CollectionRequest<T> {
    /// Short name of the request kind, for logs and mock diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            CollectionRequest::Create { .. } => "create",
            CollectionRequest::Get { .. } => "get",
            CollectionRequest::List { .. } => "list",
            CollectionRequest::Update { .. } => "update",
            CollectionRequest::Delete { .. } => "delete",
            CollectionRequest::Action { .. } => "action",
        }
    }

    /// The target document id, if the request addresses a single document.
    pub fn target(&self) -> Option<&T::Id> {
        match self {
            CollectionRequest::Get { id, .. }
            | CollectionRequest::Update { id, .. }
            | CollectionRequest::Delete { id, .. }
            | CollectionRequest::Action { id, .. } => Some(id),
            CollectionRequest::Create { .. } | CollectionRequest::List { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_open_range() {
        let query = ListQuery::descending().starting_at(10).ending_before(20);
        assert!(!query.contains(&9));
        assert!(query.contains(&10));
        assert!(query.contains(&19));
        assert!(!query.contains(&20));
        assert_eq!(query.order, SortOrder::Descending);
    }

    #[test]
    fn unbounded_query_contains_everything() {
        let query = ListQuery::<i64>::ascending();
        assert!(query.contains(&i64::MIN));
        assert!(query.contains(&i64::MAX));
    }
}

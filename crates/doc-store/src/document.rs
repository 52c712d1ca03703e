//! # Document Trait
//!
//! The `Document` trait is the contract every record type (Product, Sale, …) implements
//! to be stored in a [`CollectionActor`](crate::CollectionActor). It names the id type, the
//! create/update payloads, the custom single-document actions, the key used by ordered
//! listings, and the error type used when the collection refuses a write.
//!
//! # Write Semantics
//! The collection applies updates and actions to a *copy* of the stored document and only
//! commits the copy when the hook returns `Ok`. A hook that returns `Err` therefore never
//! leaves a half-modified record behind, even if it mutated `self` before failing.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any stored record must implement to be managed by a `CollectionActor`.
///
/// # Architecture Note
/// By defining one contract that all record types satisfy, the collection logic
/// (id assignment, CRUD, ordered listing, actions) is written *once* and reused for
/// every collection.
///
/// Associated types keep every collection strongly typed: a `Sale` collection only
/// accepts `SaleCreate` payloads, and the compiler rejects a `ProductCreate` sent to it.
pub trait Document: Clone + Send + Sync + 'static {
    /// The unique identifier for this document.
    /// Must be convertible from u32 for automatic ID generation.
    type Id: Eq + Hash + Ord + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The fields required to create a new document.
    type Create: Send + Sync + Debug;

    /// The fields of a full or partial overwrite.
    type Update: Send + Sync + Debug;

    /// Document-specific operations evaluated atomically inside the collection
    /// (e.g. `ReserveStock`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Key used to order listings and to evaluate range queries.
    type SortKey: Ord + Clone + Send + Sync + Debug;

    /// The error returned when the document refuses a create, update or action.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full document from the assigned id and the create payload.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// The ordering key for listings.
    fn sort_key(&self) -> Self::SortKey;

    /// Apply a full or partial overwrite.
    fn apply_update(&mut self, update: Self::Update) -> Result<(), Self::Error>;

    /// Handle a custom document-specific action.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}

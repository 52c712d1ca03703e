//! # DocumentClient Trait
//!
//! Common interface for collection-specific clients: default `get`, `list` and `delete`
//! built on top of a generic `CollectionClient`, with errors mapped into the
//! collection's own error type.
use crate::{CollectionClient, Document, ListQuery, StoreError};
use async_trait::async_trait;

/// Trait for collection-specific clients to inherit the standard read/delete operations.
///
/// # Example
///
/// ```rust
/// use doc_store::{CollectionClient, Document, DocumentClient, StoreError};
///
/// #[derive(Clone, Debug)] struct Note { id: u32 }
/// #[derive(Debug, thiserror::Error)] #[error("note error: {0}")] struct NoteError(String);
///
/// impl Document for Note {
///     type Id = u32; type Create = (); type Update = ();
///     type Action = (); type ActionResult = (); type SortKey = u32; type Error = NoteError;
///     fn from_create_params(id: u32, _: ()) -> Result<Self, NoteError> { Ok(Self { id }) }
///     fn sort_key(&self) -> u32 { self.id }
///     fn apply_update(&mut self, _: ()) -> Result<(), NoteError> { Ok(()) }
///     fn handle_action(&mut self, _: ()) -> Result<(), NoteError> { Ok(()) }
/// }
///
/// struct NoteClient { inner: CollectionClient<Note> }
///
/// impl DocumentClient<Note> for NoteClient {
///     type Error = NoteError;
///     fn inner(&self) -> &CollectionClient<Note> { &self.inner }
///     fn map_error(e: StoreError) -> NoteError { NoteError(e.to_string()) }
/// }
///
/// async fn usage(client: NoteClient) {
///     // get(), list() and delete() come for free
///     let _ = client.get(1).await;
///     let _ = client.delete(1).await;
/// }
/// ```
#[async_trait]
pub trait DocumentClient<T: Document>: Send + Sync {
    /// The collection-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic CollectionClient.
    fn inner(&self) -> &CollectionClient<T>;

    /// Map store errors to the collection's error type.
    fn map_error(e: StoreError) -> Self::Error;

    /// Fetch a document by id.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// List documents matching `query`, in its order.
    #[tracing::instrument(skip(self))]
    async fn list(&self, query: ListQuery<T::SortKey>) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list(query).await.map_err(Self::map_error)
    }

    /// Delete a document by id.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}

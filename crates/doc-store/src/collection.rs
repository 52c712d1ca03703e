//! # Collection Actor
//!
//! This module defines the `CollectionActor`, the server side of one document collection.
//! It owns the in-memory store and processes requests strictly one at a time, so every
//! single-document operation is atomic with respect to every other request on the same
//! collection. Nothing is atomic *across* requests or across collections.

use crate::client::CollectionClient;
use crate::document::Document;
use crate::error::StoreError;
use crate::message::{CollectionRequest, ListQuery, SortOrder};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The actor that owns one collection of documents.
///
/// # Concurrency Model
/// Each collection runs in its own Tokio task and drains its channel sequentially.
/// The `store` needs no `Mutex`: the task has exclusive ownership of it.
///
/// # Usage Pattern
///
/// 1.  **Create**: `CollectionActor::new()` returns the actor and its client.
/// 2.  **Run**: spawn `actor.run()` in a background task.
/// 3.  **Use**: clone the client wherever the collection is needed.
///
/// ```rust
/// use doc_store::{CollectionActor, Document};
///
/// #[derive(Clone, Debug)] struct Note { id: u32, text: String }
/// #[derive(Debug)] struct NoteCreate { text: String }
/// #[derive(Debug, thiserror::Error)] #[error("note error")] struct NoteError;
///
/// impl Document for Note {
///     type Id = u32; type Create = NoteCreate; type Update = String;
///     type Action = (); type ActionResult = (); type SortKey = u32; type Error = NoteError;
///     fn from_create_params(id: u32, p: NoteCreate) -> Result<Self, NoteError> { Ok(Self { id, text: p.text }) }
///     fn sort_key(&self) -> u32 { self.id }
///     fn apply_update(&mut self, text: String) -> Result<(), NoteError> { self.text = text; Ok(()) }
///     fn handle_action(&mut self, _: ()) -> Result<(), NoteError> { Ok(()) }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = CollectionActor::<Note>::new(10);
///     tokio::spawn(actor.run());
///     let note = client.create(NoteCreate { text: "hello".into() }).await.unwrap();
///     assert_eq!(note.id, 1);
/// }
/// ```
///
/// # Implementation Details
///
/// * **Create**: assigns the next `u32` id, builds the document via
///   `Document::from_create_params`, stores it and returns the stored copy.
/// * **Get**: returns a clone of the document, or `None`.
/// * **List**: filters by the query range, orders by sort key (id breaks ties).
/// * **Update / Action**: runs the hook on a copy and commits it only on success.
/// * **Delete**: removes the document; `NotFound` if it is absent.
pub struct CollectionActor<T: Document> {
    receiver: mpsc::Receiver<CollectionRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id: u32,
    entity_type: &'static str,
}

impl<T: Document> CollectionActor<T> {
    /// Creates a new `CollectionActor` and its associated `CollectionClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; callers wait for space
    /// when it is full.
    pub fn new(buffer_size: usize) -> (Self, CollectionClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        // Just the type name ("Sale"), not the full module path
        let entity_type = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown");
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id: 1,
            entity_type,
        };
        (actor, CollectionClient::new(sender))
    }

    /// Runs the collection's event loop until every client has been dropped.
    pub async fn run(mut self) {
        let entity_type = self.entity_type;
        info!(entity_type, "Collection started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CollectionRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.create(params));
                }
                CollectionRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                CollectionRequest::List { query, respond_to } => {
                    let _ = respond_to.send(Ok(self.list(&query)));
                }
                CollectionRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let result = self
                        .commit(&id, "Updated", |doc| doc.apply_update(update))
                        .map(|(doc, ())| doc);
                    let _ = respond_to.send(result);
                }
                CollectionRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.delete(&id));
                }
                CollectionRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let result = self
                        .commit(&id, "Action ok", |doc| doc.handle_action(action))
                        .map(|(_, outcome)| outcome);
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    fn create(&mut self, params: T::Create) -> Result<T, StoreError> {
        let entity_type = self.entity_type;
        debug!(entity_type, ?params, "Create");
        let id = T::Id::from(self.next_id);

        match T::from_create_params(id.clone(), params) {
            Ok(item) => {
                self.next_id += 1;
                self.store.insert(id.clone(), item.clone());
                info!(entity_type, %id, size = self.store.len(), "Created");
                Ok(item)
            }
            Err(e) => {
                warn!(entity_type, error = %e, "Create failed");
                Err(StoreError::Rejected(Box::new(e)))
            }
        }
    }

    fn list(&self, query: &ListQuery<T::SortKey>) -> Vec<T> {
        let mut hits: Vec<(T::SortKey, &T::Id, &T)> = self
            .store
            .iter()
            .map(|(id, doc)| (doc.sort_key(), id, doc))
            .filter(|(key, _, _)| query.contains(key))
            .collect();
        hits.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
        if query.order == SortOrder::Descending {
            hits.reverse();
        }
        debug!(entity_type = self.entity_type, ?query, hits = hits.len(), "List");
        hits.into_iter().map(|(_, _, doc)| doc.clone()).collect()
    }

    fn delete(&mut self, id: &T::Id) -> Result<(), StoreError> {
        let entity_type = self.entity_type;
        debug!(entity_type, %id, "Delete");
        if self.store.remove(id).is_some() {
            info!(entity_type, %id, size = self.store.len(), "Deleted");
            Ok(())
        } else {
            warn!(entity_type, %id, "Not found");
            Err(StoreError::NotFound(id.to_string()))
        }
    }

    /// Runs `hook` on a copy of the document and stores the copy only if the hook succeeds.
    fn commit<R>(
        &mut self,
        id: &T::Id,
        event: &'static str,
        hook: impl FnOnce(&mut T) -> Result<R, T::Error>,
    ) -> Result<(T, R), StoreError> {
        let entity_type = self.entity_type;
        let Some(current) = self.store.get_mut(id) else {
            warn!(entity_type, %id, "Not found");
            return Err(StoreError::NotFound(id.to_string()));
        };

        let mut candidate = current.clone();
        match hook(&mut candidate) {
            Ok(outcome) => {
                *current = candidate.clone();
                info!(entity_type, %id, "{event}");
                Ok((candidate, outcome))
            }
            Err(e) => {
                warn!(entity_type, %id, error = %e, "Write rejected");
                Err(StoreError::Rejected(Box::new(e)))
            }
        }
    }
}

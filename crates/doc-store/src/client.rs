//! # Collection Client
//!
//! The handle used to talk to a `CollectionActor`.

use crate::document::Document;
use crate::error::StoreError;
use crate::message::{CollectionRequest, ListQuery};
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for interacting with a `CollectionActor`.
///
/// Holds only a sender, so cloning is cheap and clones can be shared across tasks.
/// Every method is one independent round trip to the collection.
pub struct CollectionClient<T: Document> {
    sender: mpsc::Sender<CollectionRequest<T>>,
}

impl<T: Document> Clone for CollectionClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Document> CollectionClient<T> {
    pub fn new(sender: mpsc::Sender<CollectionRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, StoreError>>) -> CollectionRequest<T>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }

    pub async fn create(&self, params: T::Create) -> Result<T, StoreError> {
        self.request(|respond_to| CollectionRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, StoreError> {
        self.request(|respond_to| CollectionRequest::Get { id, respond_to })
            .await
    }

    pub async fn list(&self, query: ListQuery<T::SortKey>) -> Result<Vec<T>, StoreError> {
        self.request(|respond_to| CollectionRequest::List { query, respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, StoreError> {
        self.request(|respond_to| CollectionRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), StoreError> {
        self.request(|respond_to| CollectionRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, StoreError> {
        self.request(|respond_to| CollectionRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }
}

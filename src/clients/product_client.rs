//! # Product Client
//!
//! Provides a high-level API for the Product ledger.
//! It wraps a `CollectionClient<Product>` and exposes catalog and stock methods.
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use crate::product_actor::{ProductAction, ProductError};
use async_trait::async_trait;
use doc_store::{CollectionClient, DocumentClient, ListQuery, StoreError};
use tracing::{debug, info, instrument};

/// Client for the Product ledger.
#[derive(Clone)]
pub struct ProductClient {
    inner: CollectionClient<Product>,
}

impl ProductClient {
    pub fn new(inner: CollectionClient<Product>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DocumentClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &CollectionClient<Product> {
        &self.inner
    }

    /// Rejections come back as the typed [`ProductError`] the record produced.
    fn map_error(e: StoreError) -> Self::Error {
        match e.into_rejection::<ProductError>() {
            Ok(rejected) => rejected,
            Err(StoreError::NotFound(id)) => ProductError::NotFound(id),
            Err(other) => ProductError::Store(other.to_string()),
        }
    }
}

impl ProductClient {
    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Every product, ordered by id.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ProductError> {
        self.list(ListQuery::ascending()).await
    }

    #[instrument(skip(self))]
    pub async fn rename_product(
        &self,
        id: ProductId,
        name: String,
    ) -> Result<Product, ProductError> {
        let update = ProductUpdate {
            name: Some(name),
            quantity: None,
        };
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Removes a product from the catalog. Sales that reference it keep their name snapshot.
    #[instrument(skip(self))]
    pub async fn remove_product(&self, id: ProductId) -> Result<(), ProductError> {
        info!("Removing product");
        self.delete(id).await
    }

    /// Overwrites the stock level, whatever it currently is.
    #[instrument(skip(self))]
    pub async fn set_quantity(&self, id: ProductId, quantity: u32) -> Result<Product, ProductError> {
        debug!("Overwriting stock");
        let update = ProductUpdate {
            name: None,
            quantity: Some(quantity),
        };
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Check the current stock level for a product.
    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: ProductId) -> Result<u32, ProductError> {
        self.perform(id, ProductAction::CheckStock).await
    }

    /// Take `quantity` units out of stock, atomically with respect to other writers.
    ///
    /// Returns the remaining stock, or `InsufficientStock` with nothing changed.
    #[instrument(skip(self))]
    pub async fn reserve_stock(&self, id: ProductId, quantity: u32) -> Result<u32, ProductError> {
        self.perform(id, ProductAction::ReserveStock(quantity)).await
    }

    /// Put `quantity` units back into stock, atomically with respect to other writers.
    ///
    /// Returns the new stock level.
    #[instrument(skip(self))]
    pub async fn restock(&self, id: ProductId, quantity: u32) -> Result<u32, ProductError> {
        self.perform(id, ProductAction::Restock(quantity)).await
    }

    async fn perform(&self, id: ProductId, action: ProductAction) -> Result<u32, ProductError> {
        debug!(?action, "Sending action");
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_store::mock::{create_mock_client, expect_action, MockCollection};

    #[tokio::test]
    async fn test_check_stock_returns_correct_level() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let product_client = ProductClient::new(client);

        let check_task =
            tokio::spawn(async move { product_client.check_stock(ProductId(1)).await });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");

        assert_eq!(id, ProductId(1));
        assert_eq!(action, ProductAction::CheckStock);

        responder.send(Ok(42)).unwrap();

        let result = check_task.await.unwrap();
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_reserve_stock_rejection_is_typed() {
        let mut mock = MockCollection::<Product>::new();
        mock.expect_action(ProductId(1))
            .matching(|action| *action == ProductAction::ReserveStock(100))
            .return_err(StoreError::Rejected(Box::new(
                ProductError::InsufficientStock {
                    requested: 100,
                    available: 3,
                },
            )));

        let result = ProductClient::new(mock.client())
            .reserve_stock(ProductId(1), 100)
            .await;

        assert_eq!(
            result,
            Err(ProductError::InsufficientStock {
                requested: 100,
                available: 3
            })
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_store_failures_become_store_errors() {
        let mut mock = MockCollection::<Product>::new();
        mock.expect_update(ProductId(2))
            .matching(|update| update.quantity == Some(0) && update.name.is_none())
            .return_err(StoreError::Unavailable("timeout".into()));
        mock.expect_delete(ProductId(3))
            .return_err(StoreError::NotFound("product_3".into()));

        let client = ProductClient::new(mock.client());
        assert!(matches!(
            client.set_quantity(ProductId(2), 0).await,
            Err(ProductError::Store(msg)) if msg.contains("timeout")
        ));
        assert_eq!(
            client.remove_product(ProductId(3)).await,
            Err(ProductError::NotFound("product_3".into()))
        );
        mock.verify();
    }
}

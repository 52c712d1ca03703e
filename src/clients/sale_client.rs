//! # Sale Client
//!
//! Provides a high-level API for the Sale ledger, including the date-ordered
//! listings the history and report screens read.
use crate::model::{Sale, SaleCreate, SaleId, SaleUpdate};
use crate::sale_actor::SaleError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use doc_store::{CollectionClient, DocumentClient, ListQuery, StoreError};
use tracing::{debug, instrument};

/// Client for the Sale ledger.
#[derive(Clone)]
pub struct SaleClient {
    inner: CollectionClient<Sale>,
}

impl SaleClient {
    pub fn new(inner: CollectionClient<Sale>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DocumentClient<Sale> for SaleClient {
    type Error = SaleError;

    fn inner(&self) -> &CollectionClient<Sale> {
        &self.inner
    }

    fn map_error(e: StoreError) -> Self::Error {
        match e.into_rejection::<SaleError>() {
            Ok(rejected) => rejected,
            Err(StoreError::NotFound(id)) => SaleError::NotFound(id),
            Err(other) => SaleError::Store(other.to_string()),
        }
    }
}

impl SaleClient {
    /// Stores a sale as given and returns it with its assigned id.
    #[instrument(skip(self))]
    pub async fn record_sale(&self, params: SaleCreate) -> Result<Sale, SaleError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_sale(&self, id: SaleId, update: SaleUpdate) -> Result<Sale, SaleError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Every sale, most recent first.
    #[instrument(skip(self))]
    pub async fn list_ordered_by_date(&self) -> Result<Vec<Sale>, SaleError> {
        self.list(ListQuery::descending()).await
    }

    /// Sales with `from <= timestamp < to`, most recent first.
    #[instrument(skip(self))]
    pub async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Sale>, SaleError> {
        let query = ListQuery::descending().starting_at(from).ending_before(to);
        self.list(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_store::mock::MockCollection;

    #[tokio::test]
    async fn test_rejection_maps_to_sale_error() {
        let mut mock = MockCollection::<Sale>::new();
        mock.expect_update(SaleId(4))
            .return_err(StoreError::Rejected(Box::new(SaleError::ZeroQuantity)));

        let result = SaleClient::new(mock.client())
            .update_sale(
                SaleId(4),
                SaleUpdate {
                    quantity: Some(0),
                    ..SaleUpdate::default()
                },
            )
            .await;

        assert_eq!(result, Err(SaleError::ZeroQuantity));
        mock.verify();
    }

    #[tokio::test]
    async fn test_closed_store_maps_to_store_error() {
        let mut mock = MockCollection::<Sale>::new();
        mock.expect_list().return_err(StoreError::Closed);

        let result = SaleClient::new(mock.client()).list_ordered_by_date().await;
        assert!(matches!(result, Err(SaleError::Store(_))));
        mock.verify();
    }
}

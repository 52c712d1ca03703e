//! # Sale Ledger
//!
//! The Sale collection. Sales are ordered by timestamp so the ledger can answer
//! most-recent-first and date-range listings.
//!
//! - [`entity`] - [`Document`](doc_store::Document) implementation for [`Sale`]
//! - [`error`] - [`SaleError`]
//! - [`new()`] - Factory function that creates the collection and its client

pub mod entity;
pub mod error;

pub use entity::SaleAction;
pub use error::*;

use crate::clients::SaleClient;
use crate::model::Sale;
use doc_store::CollectionActor;

/// Creates a new Sale collection and its client.
pub fn new(buffer_size: usize) -> (CollectionActor<Sale>, SaleClient) {
    let (actor, generic_client) = CollectionActor::new(buffer_size);
    (actor, SaleClient::new(generic_client))
}

//! # Product Ledger
//!
//! The Product collection: stock records and the actions that adjust them.
//!
//! ## Structure
//!
//! - [`entity`] - [`Document`](doc_store::Document) implementation for [`Product`]
//! - [`error`] - [`ProductError`] type for type-safe error handling
//! - [`actions`] - [`ProductAction`] for in-collection stock adjustments
//! - [`new()`] - Factory function that creates the collection and its client
//!
//! ## Stock Writes
//!
//! Stock can be written two ways:
//!
//! ```rust,ignore
//! // Unconditional overwrite with a value computed by the caller
//! product_client.set_quantity(product_id, 7).await?;
//!
//! // Relative adjustment evaluated against the stored value
//! product_client.reserve_stock(product_id, 3).await?;
//! product_client.restock(product_id, 3).await?;
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use stock_ledger::model::ProductCreate;
//! use stock_ledger::product_actor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = product_actor::new(32);
//!     tokio::spawn(actor.run());
//!
//!     let product = client.create_product(ProductCreate::new("Widget", 100)).await?;
//!     assert_eq!(client.reserve_stock(product.id, 5).await?, 95);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::ProductClient;
use crate::model::Product;
use doc_store::CollectionActor;

/// Creates a new Product collection and its client.
pub fn new(buffer_size: usize) -> (CollectionActor<Product>, ProductClient) {
    let (actor, generic_client) = CollectionActor::new(buffer_size);
    (actor, ProductClient::new(generic_client))
}

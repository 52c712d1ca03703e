//! A stocked product.
//!
//! # Document Store
//! [`Product`] implements the [`Document`](doc_store::Document) trait,
//! allowing it to be managed by a [`CollectionActor`](doc_store::CollectionActor).
//!
//! See [`product_actor::entity`](crate::product_actor::entity) for details on:
//! - Creation parameters ([`ProductCreate`])
//! - Update parameters ([`ProductUpdate`])
//! - Custom actions ([`ProductAction`](crate::product_actor::ProductAction))

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "product_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Units currently available for sale.
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
    /// Refreshed by every rename and every stock write.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new Product instance stamped with the current time.
    ///
    /// # Arguments
    /// * `id` - Unique identifier (assigned by the collection)
    /// * `name` - Display name
    /// * `quantity` - Opening stock
    pub fn new(id: ProductId, name: impl Into<String>, quantity: u32) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            quantity,
            added_at: now,
            updated_at: now,
        }
    }

    /// Whether `requested` units can be taken from current stock.
    pub fn can_supply(&self, requested: u32) -> bool {
        requested <= self.quantity
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Payload for creating a product.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub quantity: u32,
}

impl ProductCreate {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// Partial overwrite of a product. `None` fields are left as they are.
///
/// A `quantity` here is an unconditional overwrite: whatever was stored is replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub quantity: Option<u32>,
}
